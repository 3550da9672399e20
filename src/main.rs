use clap::Parser;
use securevault::cli::commands;
use securevault::cli::{Cli, Commands, NoteAction};

fn main() {
    let cli = Cli::parse();
    securevault::logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli),
        Commands::Add {
            ref site,
            ref username,
            ref password,
            replace,
        } => commands::add::execute(
            &cli,
            site,
            username.as_deref(),
            password.as_deref(),
            replace,
        ),
        Commands::Get { ref site } => commands::get::execute(&cli, site),
        Commands::List { show } => commands::list::execute(&cli, show),
        Commands::Edit {
            ref site,
            ref new_site,
            ref username,
            ref password,
        } => commands::edit::execute(
            &cli,
            site,
            new_site.as_deref(),
            username.as_deref(),
            password.as_deref(),
        ),
        Commands::Remove { ref site, force } => commands::remove::execute(&cli, site, force),
        Commands::Note { ref action } => match action {
            NoteAction::Add {
                title,
                content,
                replace,
            } => commands::note::execute_add(&cli, title, content.as_deref(), *replace),
            NoteAction::List { show } => commands::note::execute_list(&cli, *show),
            NoteAction::Show { title } => commands::note::execute_show(&cli, title),
            NoteAction::Edit {
                title,
                new_title,
                content,
            } => commands::note::execute_edit(
                &cli,
                title,
                new_title.as_deref(),
                content.as_deref(),
            ),
            NoteAction::Remove { title, force } => {
                commands::note::execute_remove(&cli, title, *force)
            }
        },
        Commands::RotateKey => commands::rotate::execute(&cli),
        Commands::Import { ref file, replace } => {
            commands::import_cmd::execute(&cli, file, replace)
        }
        Commands::Export { ref output } => commands::export::execute(&cli, output.as_deref()),
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        securevault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
