use crate::coordinators::IdentityCoordinator;
use crate::types::internal::{PermissionSet, Role};

pub async fn list_roles(coordinator: &IdentityCoordinator) -> Result<(), Box<dyn std::error::Error>> {
    let roles = coordinator.list_roles().await?;
    if roles.is_empty() {
        println!("No roles found. Run `blue-beetle init` first.");
        return Ok(());
    }

    for role in roles {
        println!("{:<24} {:#06x}  {}", role.role_name, role.permissions.bits(), role.permissions);
    }

    Ok(())
}

pub async fn save_role(
    coordinator: &IdentityCoordinator,
    name: &str,
    permission_names: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let permissions = parse_permissions(permission_names)?;
    coordinator.save_role(&Role::new(name, permissions)).await?;

    println!("✓ Role {} saved with {}", name, permissions);
    Ok(())
}

/// Combine flag names into one set; an unknown name is an error
fn parse_permissions(names: &[String]) -> Result<PermissionSet, String> {
    names.iter().try_fold(PermissionSet::NO_PERMISSIONS, |acc, name| {
        PermissionSet::from_name(name.trim())
            .map(|flag| acc | flag)
            .ok_or_else(|| format!("unknown permission flag: {}", name))
    })
}
