//! # Component Macros
//!
//! 为 bean 类型生成 `di_abstractions::Injectable` 实现的过程宏。
//!
//! ## 核心宏
//!
//! - [`Injectable`](derive@Injectable) - 以字段名作为依赖 bean 名称生成依赖列表和构造函数
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::Injectable;
//! use std::sync::Arc;
//!
//! #[derive(Injectable)]
//! pub struct Server {
//!     port: Arc<u16>,
//!     #[inject(name = "http_client")]
//!     client: Arc<HttpClient>,
//!     #[inject(default)]
//!     requests: AtomicUsize,
//! }
//!
//! // 等价于 dependencies() == ["port", "http_client"]
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod attrs;
mod injectable;

/// bean 类型派生宏
///
/// 为结构体实现 `Injectable`：
///
/// - 具名字段按声明顺序成为依赖，bean 名称默认为字段名
/// - `#[inject(name = "...")]` 指定依赖的 bean 名称，元组结构体的字段必须指定
/// - `#[inject(default)]` 的字段不是依赖，使用 `Default::default()` 初始化
///
/// 依赖字段的类型必须实现 `FromBean`，即 `Arc<T>` 或 `BeanRef`。
///
/// # 示例
///
/// ```rust,ignore
/// #[derive(Injectable)]
/// pub struct Server {
///     port: Arc<u16>,
/// }
/// ```
#[proc_macro_derive(Injectable, attributes(inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::derive_injectable_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
