//! Who may issue which command.
//!
//! Identity is supplied from outside; this only checks an already-known
//! `User` against the board. Rules:
//! - claim: tenants only, and only for themselves
//! - complete: the slot's claimant
//! - approve / reject: admins
//! - release: the slot's claimant or an admin
//!
//! When the slot a rule depends on does not exist the check passes, so the
//! store can report the real problem (`SlotNotFound`, `TaskNotFound`).

use super::board::Board;
use super::command::Command;
use super::errors::CommandError;
use super::user::{Role, User};

pub struct Policy;

impl Policy {
    pub fn authorize(actor: &User, command: &Command, board: &Board) -> Result<(), CommandError> {
        let deny = |reason: &'static str| CommandError::NotPermitted {
            actor: actor.name.clone(),
            action: command.action(),
            reason,
        };

        let claimant = board
            .task(command.task_id())
            .and_then(|t| t.assignment(command.day()))
            .map(|a| a.claimant_id);

        match command {
            Command::Claim { user, .. } => {
                if actor.role != Role::Tenant {
                    return Err(deny("only tenants claim chores"));
                }
                if user.id != actor.id {
                    return Err(deny("cannot claim on behalf of someone else"));
                }
            }
            Command::Complete { .. } => {
                if claimant.is_some_and(|id| id != actor.id) {
                    return Err(deny("only the claimant submits proof"));
                }
            }
            Command::Approve { .. } | Command::Reject { .. } => {
                if !actor.is_admin() {
                    return Err(deny("only admins review proof"));
                }
            }
            Command::Release { .. } => {
                if !actor.is_admin() && claimant.is_some_and(|id| id != actor.id) {
                    return Err(deny("only the claimant or an admin releases a slot"));
                }
            }
        }
        Ok(())
    }
}
