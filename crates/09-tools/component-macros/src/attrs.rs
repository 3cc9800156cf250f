//! `#[inject(...)]` 属性解析

use syn::{punctuated::Punctuated, Attribute, Expr, Lit, Meta, Result, Token};

/// 字段上的注入参数
#[derive(Debug, Default)]
pub struct InjectArgs {
    /// 依赖的 bean 名称
    pub name: Option<String>,
    /// 不作为依赖，使用默认值初始化
    pub default: bool,
}

impl InjectArgs {
    /// 从字段属性中解析注入参数
    pub fn from_attributes(attrs: &[Attribute]) -> Result<Self> {
        let mut args = Self::default();

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("inject")) {
            let parsed = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;

            for meta in parsed {
                match &meta {
                    Meta::Path(path) if path.is_ident("default") => {
                        args.default = true;
                    }
                    Meta::NameValue(nv) if nv.path.is_ident("name") => {
                        args.name = Some(string_value(&nv.value)?);
                    }
                    other => {
                        return Err(syn::Error::new_spanned(
                            other,
                            "未知的 inject 参数，可用参数: name = \"...\", default",
                        ));
                    }
                }

                if args.default && args.name.is_some() {
                    return Err(syn::Error::new_spanned(
                        &meta,
                        "inject(default) 与 inject(name) 不能同时使用",
                    ));
                }
            }
        }

        Ok(args)
    }
}

fn string_value(expr: &Expr) -> Result<String> {
    if let Expr::Lit(expr_lit) = expr {
        if let Lit::Str(lit_str) = &expr_lit.lit {
            let value = lit_str.value();
            if value.is_empty() {
                return Err(syn::Error::new_spanned(lit_str, "bean 名称不能为空"));
            }
            return Ok(value);
        }
    }

    Err(syn::Error::new_spanned(expr, "bean 名称必须是字符串字面量"))
}
