use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub data_dir: PathBuf,
    pub report_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://movie.db?mode=rwc".to_string());

        let data_dir = std::env::var("DATA_DIR").map(PathBuf::from).unwrap_or_else(|_| ".".into());

        let report_dir =
            std::env::var("REPORT_DIR").map(PathBuf::from).unwrap_or_else(|_| "reports".into());

        Ok(Self { database_url, data_dir, report_dir })
    }
}
