// User management CLI commands

use std::io::{self, Write};

use crate::coordinators::IdentityCoordinator;

/// Create a user, prompting for the password when none was passed
pub async fn create_user(
    coordinator: &IdentityCoordinator,
    username: &str,
    email: &str,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let password = match password {
        Some(password) => password,
        None => prompt_for_password(username)?,
    };

    let user = coordinator.create_user(username, email, &password).await?;

    println!("✓ User created");
    println!("  Username: {}", user.username);
    println!("  Role:     {}", user.role.role_name);
    Ok(())
}

/// Reset a user's password and print the generated one
pub async fn reset_password(
    coordinator: &IdentityCoordinator,
    username: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = coordinator.load_user(username).await?;
    let password = coordinator.reset_password(&user).await?;

    println!("✓ Password reset for {}", username);
    println!("  New password: {}", password);
    println!("  It is shown only once.");
    Ok(())
}

fn prompt_for_password(username: &str) -> Result<String, Box<dyn std::error::Error>> {
    loop {
        print!("Enter password for {}: ", username);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let password = input.trim_end_matches(['\r', '\n']).to_string();

        if password.is_empty() {
            println!("❌ Password cannot be empty");
            continue;
        }
        return Ok(password);
    }
}
