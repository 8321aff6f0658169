//! Login command - signs in through the session store

use clap::Args;

use crate::forms::LoginForm;
use crate::store::AuthOutcome;

/// Arguments for the login command
#[derive(Args, Clone, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

/// Run the login command
pub async fn run(args: LoginArgs) -> anyhow::Result<()> {
    let state = super::bootstrap().await?;
    state.session.settled().await;

    let outcome = LoginForm::new(args.email, args.password)
        .submit(&state.session)
        .await?;

    let result = super::session::report(&state.session.snapshot(), outcome);
    state.dispose();
    result
}

pub(super) fn describe(outcome: AuthOutcome) -> &'static str {
    match outcome {
        AuthOutcome::Authenticated => "signed in",
        AuthOutcome::Failed => "failed",
        AuthOutcome::Superseded => "superseded by a newer request",
        AuthOutcome::Disposed => "cancelled",
    }
}
