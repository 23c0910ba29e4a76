use serde_json::Value;

use crate::auth::hash_password;
use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgStore, RecordStore};
use crate::validation::{validate_user, PasswordRule};

/// Bootstraps a login from the command line, typically the first admin
pub async fn handle(config: AppConfig, body: Value) -> anyhow::Result<()> {
    config.validate()?;

    let draft = match validate_user(&body, PasswordRule::Required) {
        Ok(draft) => draft,
        Err(err) => {
            for violation in err.violations() {
                eprintln!("{}: {}", violation.field, violation.message);
            }
            anyhow::bail!("user is invalid");
        }
    };
    let password = draft
        .password
        .ok_or_else(|| anyhow::anyhow!("password is required"))?;

    let pool = DatabaseManager::connect_lazy(&config.database)?;
    if config.database.run_migrations {
        DatabaseManager::migrate(&pool).await?;
    }
    let store = PgStore::new(pool);

    let hashed = hash_password(password, config.security.bcrypt_cost).await?;
    let id = store.insert_user(&draft.user, &hashed).await?;

    println!("Created user '{}' with id {}", draft.user.username, id);
    Ok(())
}
