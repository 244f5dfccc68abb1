use std::env;

/// Runtime configuration, read once in `main` and passed down explicitly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: String,
    pub pest_model_path: String,
    pub pest_classes_path: String,
    pub disease_model_path: String,
    pub disease_classes_path: String,
    pub pest_advice_path: String,
    pub disease_advice_path: String,
    pub static_dir: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            host: var_or("HOST", "0.0.0.0"),
            port: var_or("PORT", "8081"),
            pest_model_path: var_or("PEST_MODEL_PATH", "./models/pest.pt"),
            pest_classes_path: var_or("PEST_CLASSES_PATH", "./data/pest_classes.txt"),
            disease_model_path: var_or("DISEASE_MODEL_PATH", "./models/disease.pt"),
            disease_classes_path: var_or("DISEASE_CLASSES_PATH", "./data/disease_classes.txt"),
            pest_advice_path: var_or("PEST_ADVICE_PATH", "./data/pest_advice.json"),
            disease_advice_path: var_or("DISEASE_ADVICE_PATH", "./data/disease_advice.json"),
            static_dir: var_or("STATIC_DIR", "./static"),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}
