use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub webhook_timeout_ms: u64,
    pub queue_buffer_size: usize,
    pub default_list_limit: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            webhook_timeout_ms: env::var("WEBHOOK_TIMEOUT_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            queue_buffer_size: env::var("QUEUE_BUFFER_SIZE")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),
            default_list_limit: env::var("DEFAULT_LIST_LIMIT")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .unwrap_or(50),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            webhook_timeout_ms: 5000,
            queue_buffer_size: 1000,
            default_list_limit: 50,
        }
    }
}
