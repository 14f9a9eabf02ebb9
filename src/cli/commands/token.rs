use crate::auth::TokenKeys;
use crate::config::AppConfig;

/// Print a fresh admin token, as `/login` would return it.
pub fn handle(config: AppConfig) -> anyhow::Result<()> {
    let keys = TokenKeys::new(&config.security.jwt_secret)?;
    let token = keys.issue(config.security.admin.username(), true)?;
    println!("{}", token);
    Ok(())
}
