//! Session command - probes for a persisted session
//!
//! Sessions live in memory, so a fresh process only restores one when
//! `auth.persisted_session` names a seeded account.

use crate::store::{AuthOutcome, RouteAccess, SessionState};

/// Run the session command
pub async fn run() -> anyhow::Result<()> {
    let state = super::bootstrap().await?;
    let session = state.session.settled().await;

    println!("{}", render_session(&session));
    state.dispose();
    Ok(())
}

pub(super) fn render_session(session: &SessionState) -> String {
    let who = match &session.identity {
        Some(user) => format!(
            "{} <{}> [{}] ({})",
            user.name(),
            user.email(),
            user.initials(),
            user.role()
        ),
        None => "nobody".to_string(),
    };

    let access = match session.access() {
        RouteAccess::Pending => "pending",
        RouteAccess::Granted => "granted",
        RouteAccess::RedirectToLogin => "redirect to /login",
    };

    format!("Signed in as: {}\nProtected routes: {}", who, access)
}

/// Print the session after an auth attempt; an error if it did not sign in
pub(super) fn report(session: &SessionState, outcome: AuthOutcome) -> anyhow::Result<()> {
    println!("{}", render_session(session));

    if outcome == AuthOutcome::Authenticated {
        return Ok(());
    }

    match &session.error {
        Some(error) => anyhow::bail!("{}", error),
        None => anyhow::bail!("Authentication {}", super::login::describe(outcome)),
    }
}
