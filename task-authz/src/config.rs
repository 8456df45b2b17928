// src/config.rs
use dotenvy::dotenv;
use std::env;

#[derive(Clone, Debug)]
pub struct RolePolicyConfig {
    /// 初回登録時に Owner を割り当てるメールアドレス
    pub owner_emails: Vec<String>,
    /// 初回登録時に Admin を割り当てるメールアドレス
    pub admin_emails: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: String,
    pub default_organization_name: String,
    pub role_policy: RolePolicyConfig,
    pub audit_log_default_limit: usize,
    pub hierarchy_cache_enabled: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok(); // .env ファイルを読み込む (存在しなくてもエラーにしない)

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            default_organization_name: env::var("DEFAULT_ORGANIZATION_NAME")
                .unwrap_or_else(|_| "Default Organization".to_string()),
            role_policy: RolePolicyConfig {
                owner_emails: parse_email_list(&env::var("OWNER_EMAILS").unwrap_or_default()),
                admin_emails: parse_email_list(&env::var("ADMIN_EMAILS").unwrap_or_default()),
            },
            audit_log_default_limit: env::var("AUDIT_LOG_DEFAULT_LIMIT")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .map_err(|_| "Invalid AUDIT_LOG_DEFAULT_LIMIT value")?,
            hierarchy_cache_enabled: env::var("HIERARCHY_CACHE_ENABLED")
                .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// テスト用の設定を作成
    pub fn for_testing() -> Self {
        Self {
            environment: "test".to_string(),
            default_organization_name: "Default Organization".to_string(),
            role_policy: RolePolicyConfig {
                owner_emails: vec!["owner@test.com".to_string()],
                admin_emails: vec!["admin@test.com".to_string()],
            },
            audit_log_default_limit: 100,
            hierarchy_cache_enabled: true,
        }
    }
}

/// カンマ区切りのメールアドレス一覧を正規化して取得
fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_email_list() {
        assert_eq!(
            parse_email_list(" Owner@Test.com, ,admin@test.com "),
            vec!["owner@test.com".to_string(), "admin@test.com".to_string()]
        );
        assert!(parse_email_list("").is_empty());
    }

    #[test]
    fn test_for_testing_defaults() {
        let config = AppConfig::for_testing();
        assert!(!config.is_development());
        assert!(!config.is_production());
        assert_eq!(config.audit_log_default_limit, 100);
        assert!(config.hierarchy_cache_enabled);
    }
}
