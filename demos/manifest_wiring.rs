//! 清单装配示例
//!
//! 从 TOML 清单构建解析器，准备后所有服务共享同一组实例。

use std::sync::Arc;

use anyhow::Context;
use wiring::logging::{init_logging, LoggingConfig};
use wiring::{Arguments, Catalog, Manifest, RegistryError};

#[derive(Debug)]
struct Settings {
    app_name: String,
}

#[derive(Debug)]
struct Logger {
    settings: Arc<Settings>,
}

impl Logger {
    fn log(&self, message: &str) {
        println!("[{}] {}", self.settings.app_name, message);
    }
}

#[derive(Debug)]
struct Database {
    logger: Arc<Logger>,
}

const MANIFEST: &str = r#"
[[entries]]
name = "database"
class = "Database"
dependencies = ["logger"]

[[entries]]
name = "logger"
class = "Logger"
dependencies = ["settings"]

[[entries]]
name = "settings"
class = "Settings"
"#;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::development())
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to initialise logging")?;

    let catalog = Catalog::new()
        .with("Settings", |_: &Arguments| {
            Ok(Settings {
                app_name: "MyApp".to_string(),
            })
        })
        .with("Logger", |args: &Arguments| {
            Ok(Logger {
                settings: args.get(0)?,
            })
        })
        .with("Database", |args: &Arguments| {
            if args.len() != 1 {
                return Err(RegistryError::factory(
                    args.owner(),
                    anyhow::anyhow!("Database takes exactly one dependency"),
                ));
            }
            let logger: Arc<Logger> = args.get(0)?;
            logger.log("Initializing database service");
            Ok(Database { logger })
        });

    let resolver = Manifest::from_toml_str(MANIFEST)?.into_resolver(&catalog)?;

    println!("1️⃣ 未准备：每次解析都会重新构造");
    let first = resolver.resolve::<Database>("database")?;
    let second = resolver.resolve::<Database>("database")?;
    println!("   same logger: {}", Arc::ptr_eq(&first.logger, &second.logger));

    println!("2️⃣ 准备后：实例被记忆化");
    resolver.prepare()?;
    let first = resolver.resolve::<Database>("database")?;
    let second = resolver.resolve::<Database>("database")?;
    println!("   same logger: {}", Arc::ptr_eq(&first.logger, &second.logger));

    first.logger.log("Ready");
    Ok(())
}
