//! Register command - creates an account through the session store

use clap::Args;

use crate::forms::RegistrationForm;

/// Arguments for the register command
#[derive(Args, Clone, Debug)]
pub struct RegisterArgs {
    /// Full name shown in the header
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    #[arg(long)]
    pub confirm_password: String,
}

impl From<RegisterArgs> for RegistrationForm {
    fn from(args: RegisterArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            password: args.password,
            confirm_password: args.confirm_password,
        }
    }
}

/// Run the register command
pub async fn run(args: RegisterArgs) -> anyhow::Result<()> {
    let state = super::bootstrap().await?;
    state.session.settled().await;

    let outcome = RegistrationForm::from(args).submit(&state.session).await?;

    let result = super::session::report(&state.session.snapshot(), outcome);
    state.dispose();
    result
}
