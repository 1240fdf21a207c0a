use anyhow::Result;

use crate::{account::AccountService, storage::kv_store::KeyValueStore};

pub enum AccountCommand {
    Register {
        email: String,
        name: String,
        password: String,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
    Profile {
        name: Option<String>,
    },
}

pub async fn process_account_command(store: impl KeyValueStore, command: AccountCommand) -> Result<()> {
    let accounts = AccountService::new(store);

    match command {
        AccountCommand::Register {
            email,
            name,
            password,
        } => {
            accounts.register(&email, &name, &password).await?;
            println!("Registration successful");
        }
        AccountCommand::Login { email, password } => {
            let profile = accounts.login(&email, &password).await?;
            if profile.name.is_empty() {
                println!("Login successful");
            } else {
                println!("Login successful. Welcome {}", profile.name);
            }
        }
        AccountCommand::Logout => {
            accounts.logout().await?;
            println!("Logged out successfully!");
        }
        AccountCommand::Profile { name } => {
            let profile = match name {
                Some(name) => accounts.update_profile_name(&name).await?,
                None => accounts.current_profile().await?,
            };
            println!("Name: {}", profile.name);
            println!("Email: {}", profile.email);
        }
    }
    Ok(())
}
