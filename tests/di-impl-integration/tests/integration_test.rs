//! Centralized integration tests for di-impl crate
use di_abstractions::{
    into_bean, BeanArgs, BeanRef, DependencyError, DependencyResult, Injectable,
    ModuleConfiguration, ModuleObject, PROTOTYPE_SCOPE, SINGLETON_SCOPE,
};
use di_impl::{injector_call, injector_invoke, Injector, SingletonScope, INJECTOR_BEAN};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// 测试服务
#[derive(Debug)]
struct Server {
    port: Arc<u16>,
}

impl Injectable for Server {
    fn dependencies() -> &'static [&'static str] {
        &["port"]
    }
    fn construct(args: BeanArgs) -> DependencyResult<Self> {
        Ok(Self { port: args.get(0)? })
    }
}

/// 持有注入器的服务
struct Dispatcher {
    injector: Arc<Injector>,
}

impl Injectable for Dispatcher {
    fn dependencies() -> &'static [&'static str] {
        &[INJECTOR_BEAN]
    }
    fn construct(args: BeanArgs) -> DependencyResult<Self> {
        Ok(Self {
            injector: args.get(0)?,
        })
    }
}

/// 对象形式的模块
struct PortModule {
    port: u16,
}

impl ModuleObject for PortModule {
    fn configure(&self, config: &mut ModuleConfiguration) -> DependencyResult<()> {
        config.register("port").to_instance(self.port);
        Ok(())
    }
}

fn port_of(bean: BeanRef) -> u16 {
    *bean.downcast::<u16>().expect("port 类型错误")
}

#[tokio::test]
async fn test_child_shadows_parent_and_parent_is_isolated() -> anyhow::Result<()> {
    let parent = Injector::builder()
        .module(PortModule { port: 80 }.into_module())
        .module(|config: &mut ModuleConfiguration| {
            config.register("server").to::<Server>();
        })
        .build()?;
    let child = parent
        .child()
        .module(PortModule { port: 8080 }.into_module())
        .module(|config: &mut ModuleConfiguration| {
            config.register("admin").to_instance(String::from("admin"));
        })
        .build()?;

    assert_eq!(port_of(child.get_bean("port").await?), 8080);
    assert_eq!(port_of(parent.get_bean("port").await?), 80);

    // server 由父注入器定义，使用父注入器的 port
    let server: Arc<Server> = child.get_bean_as("server").await?;
    assert_eq!(*server.port, 80);

    assert!(child.get_bean("admin").await.is_ok());
    let error = parent.get_bean("admin").await.unwrap_err();
    assert!(matches!(error, DependencyError::UnknownBean { ref name, .. } if name == "admin"));
    Ok(())
}

#[tokio::test]
async fn test_unknown_bean_lists_names_across_chain() -> anyhow::Result<()> {
    let parent = Injector::builder()
        .module(PortModule { port: 80 }.into_module())
        .build()?;
    let child = parent
        .child()
        .module(|config: &mut ModuleConfiguration| {
            config.register("host").to_instance(String::from("localhost"));
        })
        .build()?;

    let error = child.get_bean("database").await.unwrap_err();
    let message = error.to_string();
    assert!(message.contains("database"));
    for known in ["host", "injector", "port"] {
        assert!(message.contains(known), "{message} 缺少 {known}");
    }
    Ok(())
}

#[tokio::test]
async fn test_injector_bean_resolves_to_owning_injector() -> anyhow::Result<()> {
    let parent = Injector::builder()
        .module(|config: &mut ModuleConfiguration| {
            config.register("dispatcher").to::<Dispatcher>();
        })
        .build()?;
    let child = parent.child().build()?;

    let own: Arc<Injector> = child.get_bean_as(INJECTOR_BEAN).await?;
    assert!(Arc::ptr_eq(&own, &child));

    let dispatcher: Arc<Dispatcher> = child.get_bean_as("dispatcher").await?;
    assert!(Arc::ptr_eq(&dispatcher.injector, &parent));
    Ok(())
}

#[tokio::test]
async fn test_destroy_invokes_callbacks_and_propagates_to_parent() -> anyhow::Result<()> {
    let destroyed: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let parent_log = destroyed.clone();
    let parent = Injector::builder()
        .module(move |config: &mut ModuleConfiguration| {
            let log = parent_log.clone();
            config
                .register("pool")
                .to_builder(["injector"], |_| Ok(String::from("pool")))
                .on_scope_destroy(move |bean| {
                    let value = bean.downcast::<String>().expect("pool 类型错误");
                    log.lock().unwrap().push(format!("parent:{value}"));
                });
        })
        .build()?;

    let child_log = destroyed.clone();
    let child = parent
        .child()
        .module(move |config: &mut ModuleConfiguration| {
            let log = child_log.clone();
            config
                .register("cache")
                .to_builder(["pool"], |args| {
                    let pool: Arc<String> = args.get(0)?;
                    Ok(format!("cache over {pool}"))
                })
                .on_scope_destroy(move |bean| {
                    let value = bean.downcast::<String>().expect("cache 类型错误");
                    log.lock().unwrap().push(format!("child:{value}"));
                });
            config
                .register("ephemeral")
                .to_builder(di_abstractions::NO_DEPENDENCIES, |_| Ok(1u8))
                .in_scope(PROTOTYPE_SCOPE)
                .on_scope_destroy(|_| panic!("原型作用域不保留销毁回调"));
        })
        .build()?;

    let first = child.get_bean("cache").await?;
    child.get_bean("cache").await?;
    child.get_bean("ephemeral").await?;

    child.destroy(SINGLETON_SCOPE);

    let mut log = destroyed.lock().unwrap().clone();
    log.sort();
    assert_eq!(log, ["child:cache over pool", "parent:pool"]);

    // 销毁后重新构建
    let rebuilt = child.get_bean("cache").await?;
    assert!(!Arc::ptr_eq(&first, &rebuilt));

    // 再次销毁只调用新记录的回调
    destroyed.lock().unwrap().clear();
    parent.destroy(SINGLETON_SCOPE);
    assert_eq!(*destroyed.lock().unwrap(), ["parent:pool"]);
    Ok(())
}

#[tokio::test]
async fn test_cycle_is_reported_with_chain() -> anyhow::Result<()> {
    let injector = Injector::builder()
        .module(|config: &mut ModuleConfiguration| {
            config.register("a").to_builder(["b"], |_| Ok(()));
            config.register("b").to_builder(["c"], |_| Ok(()));
            config.register("c").to_builder(["a"], |_| Ok(()));
        })
        .build()?;

    let error = injector.get_bean("a").await.unwrap_err();
    match error {
        DependencyError::CircularDependency { dependency_chain } => {
            assert_eq!(dependency_chain, "a -> b -> c -> a");
        }
        other => panic!("期望循环依赖错误，实际: {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_parent_beans_resolve_dependencies_in_parent() -> anyhow::Result<()> {
    let parent = Injector::builder()
        .module(|config: &mut ModuleConfiguration| {
            config.register("greeting").to_instance(String::from("hello"));
            config.register("message").to_builder(["greeting"], |args| {
                let greeting: Arc<String> = args.get(0)?;
                Ok(format!("{greeting}!"))
            });
        })
        .build()?;
    let child = parent
        .child()
        .module(|config: &mut ModuleConfiguration| {
            config.register("greeting").to_instance(String::from("hi"));
            config.register("outer").to_builder(["message", "greeting"], |args| {
                let message: Arc<String> = args.get(0)?;
                let greeting: Arc<String> = args.get(1)?;
                Ok(format!("[{message}] {greeting}"))
            });
        })
        .build()?;

    let outer: Arc<String> = child.get_bean_as("outer").await?;
    assert_eq!(outer.as_str(), "[hello!] hi");
    Ok(())
}

#[tokio::test]
async fn test_concurrent_singleton_requests_build_once() -> anyhow::Result<()> {
    let builds = Arc::new(AtomicUsize::new(0));
    let counter = builds.clone();
    let injector = Injector::builder()
        .module(move |config: &mut ModuleConfiguration| {
            let counter = counter.clone();
            config
                .register("slow")
                .to_async_builder(di_abstractions::NO_DEPENDENCIES, move |_| {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok::<_, DependencyError>(42u32)
                    }
                });
            config.register("left").to_bean_builder(["slow"], |args| args.get(0));
            config.register("right").to_bean_builder(["slow"], |args| args.get(0));
        })
        .build()?;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let injector = injector.clone();
            tokio::spawn(async move { injector.get_bean("slow").await })
        })
        .collect();
    let beans = injector.get_beans(["left", "right"]).await?;
    assert_eq!(beans.len(), 2);

    let mut instances = Vec::new();
    for handle in handles {
        instances.push(handle.await??);
    }

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    let slow = injector.get_bean("slow").await?;
    for instance in &instances {
        assert!(Arc::ptr_eq(instance, &slow));
    }
    for name in ["left", "right"] {
        let forwarded = injector.get_bean(name).await?;
        assert!(Arc::ptr_eq(&forwarded, &slow));
    }
    Ok(())
}

#[tokio::test]
async fn test_failed_dependency_aborts_build() -> anyhow::Result<()> {
    let builds = Arc::new(AtomicUsize::new(0));
    let counter = builds.clone();
    let injector = Injector::builder()
        .module(move |config: &mut ModuleConfiguration| {
            let counter = counter.clone();
            config.register("broken").to_builder(
                di_abstractions::NO_DEPENDENCIES,
                |_| -> DependencyResult<u8> {
                    Err(DependencyError::creation_failed("broken", "连接被拒绝"))
                },
            );
            config.register("service").to_builder(["port", "broken"], move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
            config.register("port").to_instance(8080u16);
        })
        .build()?;

    let error = injector.get_bean("service").await.unwrap_err();
    assert!(matches!(error, DependencyError::BeanCreationFailed { ref name, .. } if name == "broken"));
    assert_eq!(builds.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_get_by_type_sees_only_fixed_instances() -> anyhow::Result<()> {
    let injector = Injector::builder()
        .module(|config: &mut ModuleConfiguration| {
            config.register("http").to_instance(80u16);
            config.register("built").to_builder(di_abstractions::NO_DEPENDENCIES, |_| Ok(7u16));
            config.register("https").to_instance(443u16);
        })
        .build()?;

    // 构建过的实例依然不可见
    injector.get_bean("built").await?;

    let first = injector.get_by_type::<u16>().expect("应找到固定实例");
    assert_eq!(*first, 80);

    let all: Vec<u16> = injector.get_all_by_type::<u16>().iter().map(|port| **port).collect();
    assert_eq!(all, [80, 443]);

    let itself = injector.get_by_type::<Injector>().expect("应找到注入器自身");
    assert!(Arc::ptr_eq(&itself, &injector));

    assert!(injector.get_by_type::<String>().is_none());
    Ok(())
}

#[tokio::test]
async fn test_injector_call_and_invoke() -> anyhow::Result<()> {
    let injector = Injector::builder()
        .module(|config: &mut ModuleConfiguration| {
            config.register("port").to_instance(8080u16);
            config.register("server").to::<Server>();
        })
        .build()?;

    let port = injector_call(&injector, ["server"], Vec::new(), |args| {
        let server: Arc<Server> = args.get(0)?;
        Ok(*server.port)
    })
    .await?;
    assert_eq!(port, 8080);

    let overridden = injector_call(
        &injector,
        ["port", "missing"],
        vec![into_bean(9090u16), into_bean(String::from("stub"))],
        |args| {
            let port: Arc<u16> = args.get(0)?;
            let stub: Arc<String> = args.get(1)?;
            Ok(format!("{stub}:{port}"))
        },
    )
    .await?;
    assert_eq!(overridden, "stub:9090");

    let base = 10u16;
    let shifted = injector_invoke(&injector, &base, ["port"], Vec::new(), |base, args| {
        let port: Arc<u16> = args.get(0)?;
        Ok(*port + *base)
    })
    .await?;
    assert_eq!(shifted, 8090);
    Ok(())
}

#[tokio::test]
async fn test_type_mismatch_names_bean() -> anyhow::Result<()> {
    let injector = Injector::builder()
        .module(|config: &mut ModuleConfiguration| {
            config.register("port").to_instance(8080u16);
        })
        .build()?;

    let error = injector.get_bean_as::<String>("port").await.unwrap_err();
    assert!(matches!(error, DependencyError::TypeMismatch { ref name, .. } if name == "port"));
    Ok(())
}

fn recording(
    log: &Arc<Mutex<Vec<String>>>,
    label: &'static str,
) -> impl Fn(BeanRef) + Clone + Send + Sync + 'static {
    let log = log.clone();
    move |_| log.lock().unwrap().push(label.to_string())
}

#[tokio::test]
async fn test_unregistered_child_scope_escalates_to_parent() -> anyhow::Result<()> {
    let destroyed = Arc::new(Mutex::new(Vec::new()));
    let parent = Injector::builder().build()?;
    let on_destroy = recording(&destroyed, "x");
    let child = parent
        .child()
        .module(move |config: &mut ModuleConfiguration| {
            let on_destroy = on_destroy.clone();
            config
                .register("x")
                .to_builder(di_abstractions::NO_DEPENDENCIES, |_| Ok(String::from("x")))
                .on_scope_destroy(move |bean| on_destroy(bean));
        })
        .build()?;

    assert!(child.unregister_scope(SINGLETON_SCOPE).is_some());

    // 子注入器已没有 singleton 作用域，实例缓存在父注入器的同名作用域中
    let first = child.get_bean("x").await?;
    let second = child.get_bean("x").await?;
    assert!(Arc::ptr_eq(&first, &second));

    // 本地没有同名作用域时销毁仍然传递给父注入器
    child.destroy(SINGLETON_SCOPE);
    assert_eq!(*destroyed.lock().unwrap(), ["x"]);

    let rebuilt = child.get_bean("x").await?;
    assert!(!Arc::ptr_eq(&first, &rebuilt));
    Ok(())
}

#[tokio::test]
async fn test_scope_registered_only_in_parent_is_found() -> anyhow::Result<()> {
    let destroyed = Arc::new(Mutex::new(Vec::new()));
    let parent = Injector::builder().build()?;
    parent.register_scope("session", Arc::new(SingletonScope::new()));

    let builds = Arc::new(AtomicUsize::new(0));
    let counter = builds.clone();
    let on_destroy = recording(&destroyed, "token");
    let child = parent
        .child()
        .module(move |config: &mut ModuleConfiguration| {
            let counter = counter.clone();
            let on_destroy = on_destroy.clone();
            config
                .register("token")
                .to_builder(di_abstractions::NO_DEPENDENCIES, move |_| {
                    Ok(counter.fetch_add(1, Ordering::SeqCst))
                })
                .in_scope("session")
                .on_scope_destroy(move |bean| on_destroy(bean));
        })
        .build()?;

    let first = child.get_bean("token").await?;
    let second = child.get_bean("token").await?;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(!parent.has_bean("token"));

    child.destroy("session");
    assert_eq!(*destroyed.lock().unwrap(), ["token"]);

    child.get_bean("token").await?;
    assert_eq!(builds.load(Ordering::SeqCst), 2);

    // 父注入器移除作用域后子注入器也找不到
    parent.unregister_scope("session");
    child.destroy("session");
    let error = child.get_bean("token").await.unwrap_err();
    assert!(matches!(error, DependencyError::UnknownScope { ref scope, .. } if scope == "session"));
    Ok(())
}

#[tokio::test]
async fn test_dependencies_are_requested_together_and_passed_in_order() -> anyhow::Result<()> {
    let settled = Arc::new(Mutex::new(Vec::new()));
    let log = settled.clone();
    let injector = Injector::builder()
        .module(move |config: &mut ModuleConfiguration| {
            for (name, value, delay) in [("slow", 1u32, 150u64), ("fast", 2u32, 120u64)] {
                let log = log.clone();
                config
                    .register(name)
                    .to_async_builder(di_abstractions::NO_DEPENDENCIES, move |_| {
                        let log = log.clone();
                        async move {
                            tokio::time::sleep(Duration::from_millis(delay)).await;
                            log.lock().unwrap().push(name);
                            Ok::<_, DependencyError>(value)
                        }
                    });
            }
            config.register("pair").to_builder(["slow", "fast"], |args| {
                let slow: Arc<u32> = args.get(0)?;
                let fast: Arc<u32> = args.get(1)?;
                Ok((*slow, *fast))
            });
        })
        .build()?;

    let started = Instant::now();
    let pair: Arc<(u32, u32)> = injector.get_bean_as("pair").await?;
    let elapsed = started.elapsed();

    assert_eq!(*pair, (1, 2));
    assert_eq!(*settled.lock().unwrap(), ["fast", "slow"]);
    assert!(elapsed >= Duration::from_millis(150), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(250), "依赖被依次解析: {elapsed:?}");
    Ok(())
}
