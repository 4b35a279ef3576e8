use anyhow::{Context, Result};
use serde::Serialize;
use url::Url;

/// Device endpoints the frontend talks to, resolved against the device root URL
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeviceEndpoints {
    pub root: String,
    pub ws: String,
    pub upgrade: String,
    pub config: String,
    pub auth: String,
}

impl DeviceEndpoints {
    /// `root` may be a bare host, in which case `http://` is assumed
    pub fn from_root(root: &str) -> Result<Self> {
        let root = parse_root(root)?;

        let mut ws = join(&root, "ws")?;
        let ws_scheme = if root.scheme() == "https" { "wss" } else { "ws" };
        ws.set_scheme(ws_scheme)
            .map_err(|_| anyhow::anyhow!("failed to set scheme {ws_scheme} on {ws}"))?;

        Ok(Self {
            ws: ws.into(),
            upgrade: join(&root, "upgrade")?.into(),
            config: join(&root, "config")?.into(),
            auth: join(&root, "auth")?.into(),
            root: root.into(),
        })
    }
}

/// Parse the device root URL
pub fn parse_root(root: &str) -> Result<Url> {
    let root = root.trim();
    let root = if root.starts_with("http:") || root.starts_with("https:") {
        root.to_string()
    } else {
        format!("http://{root}")
    };

    Url::parse(&root).with_context(|| format!("failed to parse device url: {root}"))
}

fn join(root: &Url, path: &str) -> Result<Url> {
    root.join(path)
        .with_context(|| format!("failed to resolve {path} against {root}"))
}
