use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub camera: CameraSettings,
    pub matching: MatchingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub listen: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraSettings {
    pub default_fov_degrees: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MatchingSettings {
    pub duration_tolerance_ms: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InfluxConfig {
    pub influx: InfluxSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InfluxSettings {
    pub host: String,
    pub token: String,
    pub database: String,
    pub retention_policy: String,
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/app"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_influx_config() -> anyhow::Result<InfluxConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/influx"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
