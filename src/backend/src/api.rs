use crate::{config::AppConfig, endpoints::DeviceEndpoints};
use actix_files::{Files, NamedFile};
use actix_web::{HttpResponse, Responder, http::header::ContentType, web};
use log::{debug, error};
use std::path::PathBuf;

const INDEX_HTML: &str = "index.html";
const FRONTEND_CONFIG_VAR: &str = "window.__ESPURNA_UI_CONFIG__";

#[derive(Clone, Debug)]
pub struct Api {
    pub endpoints: DeviceEndpoints,
    pub static_dir: PathBuf,
}

impl Api {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            endpoints: config.device.endpoints.clone(),
            static_dir: config.paths.static_dir.clone(),
        }
    }

    pub async fn index(api: web::Data<Self>) -> actix_web::Result<NamedFile> {
        debug!("index() called");

        NamedFile::open(api.static_dir.join(INDEX_HTML)).map_err(|e| {
            error!("failed to open {INDEX_HTML}: {e}");
            actix_web::error::ErrorNotFound("index.html not found")
        })
    }

    pub async fn config(api: web::Data<Self>) -> impl Responder {
        debug!("config() called");

        match frontend_config(&api.endpoints) {
            Ok(script) => HttpResponse::Ok()
                .content_type("application/javascript")
                .body(script),
            Err(e) => {
                error!("failed to render frontend config: {e:#}");
                HttpResponse::InternalServerError().body(e.to_string())
            }
        }
    }

    pub async fn version() -> impl Responder {
        HttpResponse::Ok()
            .insert_header(ContentType::plaintext())
            .body(env!("CARGO_PKG_VERSION"))
    }
}

/// Register the UI routes, serving assets below `/static` from the static directory
pub fn configure(api: Api) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let static_dir = api.static_dir.clone();

        cfg.app_data(web::Data::new(api))
            .route("/", web::get().to(Api::index))
            .route("/config.js", web::get().to(Api::config))
            .route("/version", web::get().to(Api::version))
            .service(Files::new("/static", static_dir))
            .default_service(web::route().to(Api::index));
    }
}

/// Script assigning the device endpoints to the global the frontend reads
pub fn frontend_config(endpoints: &DeviceEndpoints) -> serde_json::Result<String> {
    Ok(format!(
        "{FRONTEND_CONFIG_VAR} = {};",
        serde_json::to_string(endpoints)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontend_config_assigns_endpoints() {
        let endpoints = DeviceEndpoints::from_root("192.168.4.1").unwrap();

        let script = frontend_config(&endpoints).unwrap();

        assert_eq!(
            script,
            "window.__ESPURNA_UI_CONFIG__ = {\"root\":\"http://192.168.4.1/\",\"ws\":\"ws://192.168.4.1/ws\",\"upgrade\":\"http://192.168.4.1/upgrade\",\"config\":\"http://192.168.4.1/config\",\"auth\":\"http://192.168.4.1/auth\"};"
        );
    }
}
