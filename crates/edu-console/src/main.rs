#![allow(non_snake_case)]

#[cfg(feature = "ssr")]
mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Clone, Debug, Default)]
    #[serde(default)]
    pub struct Config {
        pub server: ServerConfig,
        pub api: ApiConfig,
    }

    #[derive(Deserialize, Clone, Debug)]
    #[serde(default)]
    pub struct ServerConfig {
        pub bind: String,
        pub port: u16,
    }

    /// Where `/api/*` requests are forwarded.
    #[derive(Deserialize, Clone, Debug)]
    #[serde(default)]
    pub struct ApiConfig {
        pub upstream: String,
        pub timeout_secs: u64,
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                bind: "0.0.0.0".into(),
                port: 3000,
            }
        }
    }

    impl Default for ApiConfig {
        fn default() -> Self {
            Self {
                upstream: "http://127.0.0.1:8000/api/v1".into(),
                timeout_secs: 30,
            }
        }
    }

    impl ServerConfig {
        pub fn address(&self) -> String {
            format!("{}:{}", self.bind, self.port)
        }
    }

    pub fn load(path: &str) -> Config {
        match std::fs::read_to_string(path) {
            Ok(contents) => parse(&contents).unwrap_or_else(|e| {
                tracing::warn!("failed to parse config {path}: {e}, using defaults");
                Config::default()
            }),
            Err(e) => {
                tracing::warn!("failed to read config {path}: {e}, using defaults");
                Config::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(contents)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn partial_file_keeps_defaults() {
            let config = parse("[api]\nupstream = \"https://edu.example.com/api/v1\"\n").unwrap();
            assert_eq!(config.api.upstream, "https://edu.example.com/api/v1");
            assert_eq!(config.api.timeout_secs, 30);
            assert_eq!(config.server.address(), "0.0.0.0:3000");
        }

        #[test]
        fn wrong_types_are_rejected() {
            assert!(parse("[server]\nport = \"eighty\"\n").is_err());
        }
    }
}

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use std::time::Duration;

    use axum::Router;
    use edu_api::AppState;
    use edu_ui::{shell, App};
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use tower_http::trace::TraceLayer;
    use tracing_subscriber::{fmt, EnvFilter};

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let configPath = if let Some(idx) = args.iter().position(|a| a == "--config") {
        args.get(idx + 1)
            .cloned()
            .unwrap_or_else(|| "config.example.toml".into())
    } else {
        "config.example.toml".into()
    };

    let appConfig = config::load(&configPath);
    tracing::info!(
        "loaded config from {configPath}: bind={}, upstream={}",
        appConfig.server.address(),
        appConfig.api.upstream
    );

    let appState = match AppState::new(
        &appConfig.api.upstream,
        Duration::from_secs(appConfig.api.timeout_secs),
    ) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("cannot start API gateway: {e}");
            std::process::exit(1);
        }
    };

    let conf = get_configuration(None).expect("failed to load Leptos configuration");
    let leptosOptions = conf.leptos_options;
    let addr = appConfig.server.address();

    let routes = generate_route_list(App);
    let apiRouter = edu_api::api_router(appState);

    let app = Router::new()
        .leptos_routes(&leptosOptions, routes, {
            let leptosOptions = leptosOptions.clone();
            move || shell(leptosOptions.clone())
        })
        .fallback(leptos_axum::file_and_error_handler(shell))
        .with_state(leptosOptions)
        .merge(apiRouter)
        .layer(TraceLayer::new_for_http());

    tracing::info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    axum::serve(listener, app.into_make_service())
        .await
        .expect("server exited with error");
}

#[cfg(not(feature = "ssr"))]
fn main() {}
