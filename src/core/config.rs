use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub swagger: SwaggerConfig,
    pub s3: S3Settings,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Object-storage settings, loaded once at startup and shared read-only
#[derive(Clone, PartialEq, Eq)]
pub struct S3Settings {
    /// Access key ID; `None` means credentials come from the environment
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// AWS region (or the region name an S3-compatible server expects)
    pub region: String,
    pub bucket_name: String,
    /// Custom endpoint for S3-compatible servers such as MinIO
    pub endpoint: Option<String>,
    /// Use path-style URLs (http://endpoint/bucket) instead of virtual hosts
    pub path_style: bool,
}

/// How the backend client obtains credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMode<'a> {
    Explicit {
        access_key_id: &'a str,
        secret_access_key: &'a str,
    },
    /// Environment variables, shared profile, web identity or instance role
    Ambient,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            app: AppConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            s3: S3Settings::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "S3 Permission Probe API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Checks which object-storage operations the configured credentials allow".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl S3Settings {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (environment, test maps)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let region = non_empty("S3_REGION")
            .ok_or_else(|| "S3_REGION environment variable is required".to_string())?;

        let bucket_name = non_empty("S3_BUCKET_NAME")
            .ok_or_else(|| "S3_BUCKET_NAME environment variable is required".to_string())?;

        let access_key_id = non_empty("S3_ACCESS_KEY_ID");
        let secret_access_key = non_empty("S3_SECRET_ACCESS_KEY");

        if access_key_id.is_some() && secret_access_key.is_none() {
            return Err(
                "S3_SECRET_ACCESS_KEY must be set when S3_ACCESS_KEY_ID is provided".to_string(),
            );
        }

        let endpoint = non_empty("S3_ENDPOINT").map(|e| e.trim_end_matches('/').to_string());

        let path_style = match non_empty("S3_PATH_STYLE") {
            Some(v) => v
                .parse::<bool>()
                .map_err(|_| "S3_PATH_STYLE must be true or false".to_string())?,
            None => false,
        };

        Ok(Self {
            access_key_id,
            secret_access_key,
            region,
            bucket_name,
            endpoint,
            path_style,
        })
    }

    pub fn credential_mode(&self) -> CredentialMode<'_> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => CredentialMode::Explicit {
                access_key_id,
                secret_access_key,
            },
            _ => CredentialMode::Ambient,
        }
    }

    /// Endpoint URL the client talks to; AWS regional endpoint by default
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://s3.{}.amazonaws.com", self.region),
        }
    }
}

// Keeps the secret out of logs
impl std::fmt::Debug for S3Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Settings")
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "***"),
            )
            .field("region", &self.region)
            .field("bucket_name", &self.bucket_name)
            .field("endpoint", &self.endpoint)
            .field("path_style", &self.path_style)
            .finish()
    }
}
