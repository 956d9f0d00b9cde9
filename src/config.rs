use std::env;
use std::path::PathBuf;

const DEFAULT_EMPLOYEES_CSV: &str = "./data/employees.csv";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_uri: String,
    pub employees_csv: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let google_client_id = env::var("GOOGLE_CLIENT_ID")
            .map_err(|_| "GOOGLE_CLIENT_ID must be set".to_string())?;

        let google_client_secret = env::var("GOOGLE_CLIENT_SECRET")
            .map_err(|_| "GOOGLE_CLIENT_SECRET must be set".to_string())?;

        let google_redirect_uri = env::var("GOOGLE_REDIRECT_URI")
            .map_err(|_| "GOOGLE_REDIRECT_URI must be set".to_string())?;

        let employees_csv = env::var("EMPLOYEES_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_EMPLOYEES_CSV));

        Ok(Self {
            google_client_id,
            google_client_secret,
            google_redirect_uri,
            employees_csv,
        })
    }
}
