use clap::Parser;
use stencil::application::{
    compile_template::load_stream, list_templates, CompileTemplateService, ResolveSourceService,
};
use stencil::cli::{format_compiled, format_source, format_template_list, Cli, Commands};
use stencil::error::StencilError;
use stencil::infrastructure::Config;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("STENCIL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), StencilError> {
    let engine = Config::discover(cli.config_file.as_deref())?.into_engine()?;

    match cli.command {
        Commands::Resolve {
            name,
            config,
            parent,
        } => {
            let source =
                ResolveSourceService::new(&engine).execute(&name, config, parent.as_deref())?;
            print!("{}", format_source(&source));
            Ok(())
        }
        Commands::Compile { stream, template } => {
            let tags = load_stream(&stream)?;
            let compiled = CompileTemplateService::new(&engine).execute(template.as_deref(), &tags)?;
            println!("{}", format_compiled(&compiled).trim_end());
            Ok(())
        }
        Commands::List => {
            println!("{}", format_template_list(&list_templates(&engine)).trim_end());
            Ok(())
        }
    }
}
