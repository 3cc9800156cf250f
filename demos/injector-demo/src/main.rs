//! # 注入器示例程序
//!
//! 演示如何用模块声明 bean、在父子注入器之间共享服务，以及销毁作用域

use clap::Parser;
use component_macros::Injectable;
use di_abstractions::{
    InjectorSettings, ModuleConfiguration, ModuleObject, DEFAULT_ENV_PREFIX, PROTOTYPE_SCOPE,
    SINGLETON_SCOPE,
};
use di_impl::{injector_call, Injector, SingletonScope};
use infrastructure_common::DependencyResult;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "injector-demo")]
#[command(about = "bean 注入器示例")]
struct Args {
    /// 注入器配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 服务端口
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// 默认日志级别，RUST_LOG 优先
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// 服务端
#[derive(Debug, Injectable)]
struct Server {
    port: Arc<u16>,
    #[inject(default)]
    served: AtomicU64,
}

impl Server {
    fn serve(&self, path: &str) -> String {
        let count = self.served.fetch_add(1, Ordering::SeqCst) + 1;
        format!("#{count} GET {path} on :{}", self.port)
    }
}

/// 单个请求的上下文
#[derive(Debug)]
struct RequestContext {
    id: u64,
}

/// 请求处理器
#[derive(Debug, Injectable)]
struct Handler {
    server: Arc<Server>,
    #[inject(name = "request_context")]
    request: Arc<RequestContext>,
}

/// 应用级模块
struct ApplicationModule {
    port: u16,
}

impl ModuleObject for ApplicationModule {
    fn configure(&self, config: &mut ModuleConfiguration) -> DependencyResult<()> {
        config.register("port").to_instance(self.port);
        config
            .register("server")
            .to::<Server>()
            .in_scope(SINGLETON_SCOPE)
            .on_scope_destroy(|bean| {
                if let Ok(server) = bean.downcast::<Server>() {
                    info!("关闭服务端，共处理 {} 个请求", server.served.load(Ordering::SeqCst));
                }
            });
        Ok(())
    }
}

/// 构建请求级子注入器
fn request_injector(app: &Arc<Injector>, id: u64) -> DependencyResult<Arc<Injector>> {
    let injector = app
        .child()
        .module(move |config: &mut ModuleConfiguration| {
            config
                .register("request_context")
                .to_builder(di_abstractions::NO_DEPENDENCIES, move |_| Ok(RequestContext { id }))
                .in_scope("request");
            config.register("handler").to::<Handler>().in_scope(PROTOTYPE_SCOPE);
        })
        .build()?;

    injector.register_scope("request", Arc::new(SingletonScope::new()));
    Ok(injector)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("启动注入器示例");

    let settings = InjectorSettings::load(args.config.as_deref(), DEFAULT_ENV_PREFIX)?;
    info!("注入器配置: {:?}", settings);

    let app = Injector::builder()
        .settings(settings)
        .module(ApplicationModule { port: args.port }.into_module())
        .build()?;

    for id in 1..=3 {
        let request = request_injector(&app, id)?;
        let handler: Arc<Handler> = request.get_bean_as("handler").await?;
        info!(
            "请求 {}: {}",
            handler.request.id,
            handler.server.serve(&format!("/items/{id}"))
        );
        request.destroy("request");
    }

    let beans = app.get_beans(["port", "server"]).await?;
    info!("已解析 bean: {:?}", beans.keys().collect::<Vec<_>>());

    let summary = injector_call(&app, ["server", "port"], Vec::new(), |args| {
        let server: Arc<Server> = args.get(0)?;
        let port: Arc<u16> = args.get(1)?;
        Ok(format!("端口 {port} 上已处理 {} 个请求", server.served.load(Ordering::SeqCst)))
    })
    .await?;
    info!("{}", summary);

    app.destroy(SINGLETON_SCOPE);
    info!("示例结束");

    Ok(())
}
