//! Allow/deny checks run before every command.

use serenity::all::Permissions;

use crate::server::{
    bot::command::{context::Caller, CommandCategory, CommandSpec},
    error::command::CommandError,
};

/// Guild context the gate needs besides the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct GateScope<'a> {
    pub in_guild: bool,
    /// Roles configured as moderator roles for the guild.
    pub mod_role_ids: &'a [u64],
}

/// Decides whether `caller` may run the command described by `spec`.
///
/// - Owner-only commands need the configured owner.
/// - Guild-only commands are rejected in DMs.
/// - Permissioned commands need every required bit; ADMINISTRATOR satisfies all.
/// - Moderation commands also accept a configured moderator role.
pub fn check(spec: &CommandSpec, caller: &Caller, scope: GateScope<'_>) -> Result<(), CommandError> {
    if spec.owner_only && !caller.is_owner {
        return Err(CommandError::OwnerOnly);
    }
    if spec.guild_only && !scope.in_guild {
        return Err(CommandError::GuildOnly);
    }
    if spec.permissions.is_empty() || caller.permissions.administrator() {
        return Ok(());
    }
    if caller.permissions.contains(spec.permissions) {
        return Ok(());
    }
    if spec.category == CommandCategory::Moderation
        && caller.role_ids.iter().any(|r| scope.mod_role_ids.contains(r))
    {
        return Ok(());
    }

    Err(CommandError::MissingPermissions(permission_names(
        spec.permissions - caller.permissions,
    )))
}

fn permission_names(missing: Permissions) -> String {
    let names: Vec<String> = missing.get_permission_names().into_iter().map(String::from).collect();
    if names.is_empty() {
        missing.to_string()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::bot::command::CommandSpec;

    fn caller(permissions: Permissions) -> Caller {
        Caller {
            user_id: 1,
            name: "tester".to_string(),
            role_ids: vec![50],
            permissions,
            is_owner: false,
        }
    }

    fn guild() -> GateScope<'static> {
        GateScope {
            in_guild: true,
            mod_role_ids: &[],
        }
    }

    fn ban() -> CommandSpec {
        CommandSpec::new("ban", "Ban", CommandCategory::Moderation)
            .permissions(Permissions::BAN_MEMBERS)
    }

    /// Expect commands without requirements to pass for anyone
    #[test]
    fn open_command_passes() {
        let spec = CommandSpec::new("ping", "Ping", CommandCategory::General);

        assert_eq!(check(&spec, &caller(Permissions::empty()), GateScope::default()), Ok(()));
    }

    /// Expect owner-only commands to reject everyone but the owner
    #[test]
    fn owner_only() {
        let spec = CommandSpec::new("shutdown", "Stop", CommandCategory::Owner).owner_only();
        let mut owner = caller(Permissions::empty());
        owner.is_owner = true;

        assert_eq!(
            check(&spec, &caller(Permissions::ADMINISTRATOR), guild()),
            Err(CommandError::OwnerOnly)
        );
        assert_eq!(check(&spec, &owner, guild()), Ok(()));
    }

    /// Expect guild-only commands to be rejected in DMs
    #[test]
    fn guild_only_in_dm() {
        assert_eq!(
            check(&ban(), &caller(Permissions::ADMINISTRATOR), GateScope::default()),
            Err(CommandError::GuildOnly)
        );
    }

    /// Expect the exact permission or ADMINISTRATOR to pass
    #[test]
    fn permission_bits() {
        assert_eq!(check(&ban(), &caller(Permissions::BAN_MEMBERS), guild()), Ok(()));
        assert_eq!(check(&ban(), &caller(Permissions::ADMINISTRATOR), guild()), Ok(()));
        assert!(matches!(
            check(&ban(), &caller(Permissions::KICK_MEMBERS), guild()),
            Err(CommandError::MissingPermissions(_))
        ));
    }

    /// Expect a moderator role to unlock moderation commands only
    #[test]
    fn mod_role_unlocks_moderation() {
        let scope = GateScope {
            in_guild: true,
            mod_role_ids: &[50],
        };
        let config = CommandSpec::new("config", "Settings", CommandCategory::Config)
            .permissions(Permissions::MANAGE_GUILD);

        assert_eq!(check(&ban(), &caller(Permissions::empty()), scope), Ok(()));
        assert!(check(&config, &caller(Permissions::empty()), scope).is_err());
    }
}
