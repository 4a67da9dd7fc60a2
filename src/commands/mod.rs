//! Command-line interface of gigtask.
//!
//! Each subcommand lives in its own module with a clap `Args` struct and a
//! `cmd` entry point. Commands that touch tasks go through [`AppContext`],
//! which opens the local stores and resolves the signed-in user.

pub mod add;
pub mod calendar;
pub mod context;
pub mod delete;
pub mod done;
pub mod edit;
pub mod init;
pub mod list;
pub mod login;
pub mod logout;
pub mod reset;
pub mod signup;
pub mod watch;
pub mod whoami;

pub use context::AppContext;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Create an account and sign in")]
    Signup(signup::SignupArgs),
    #[command(about = "Sign in")]
    Login(login::LoginArgs),
    #[command(about = "Sign out")]
    Logout,
    #[command(about = "Request a password reset")]
    Reset(reset::ResetArgs),
    #[command(about = "Show the signed-in account")]
    Whoami,
    #[command(about = "Create a task", arg_required_else_help = true)]
    Add(add::AddArgs),
    #[command(about = "Edit a task", arg_required_else_help = true)]
    Edit(edit::EditArgs),
    #[command(about = "Toggle a task between done and not done", arg_required_else_help = true)]
    Done(done::DoneArgs),
    #[command(about = "Delete a task", arg_required_else_help = true)]
    Delete(delete::DeleteArgs),
    #[command(about = "List tasks grouped by due date")]
    List(list::ListArgs),
    #[command(about = "Show tasks on a month calendar")]
    Calendar(calendar::CalendarArgs),
    #[command(about = "Keep the grouped task list on screen and live")]
    Watch,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Signup(args) => signup::cmd(args),
            Commands::Login(args) => login::cmd(args),
            Commands::Logout => logout::cmd(),
            Commands::Reset(args) => reset::cmd(args),
            Commands::Whoami => whoami::cmd(),
            Commands::Add(args) => add::cmd(args),
            Commands::Edit(args) => edit::cmd(args),
            Commands::Done(args) => done::cmd(args),
            Commands::Delete(args) => delete::cmd(args),
            Commands::List(args) => list::cmd(args),
            Commands::Calendar(args) => calendar::cmd(args),
            Commands::Watch => watch::cmd().await,
        }
    }
}
