use anyhow::{Context, Result};
use blogwright::cli::{self, Command};
use blogwright::config::Config;
use blogwright::generator::request::BlogRequest;
use blogwright::generator::workflow::BlogWorkflow;
use blogwright::{logging, server};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let config = args.into_config()?;
    logging::init(config.verbose);

    match &args.command {
        Command::Generate(generate) => generate_once(config, generate.to_request()).await,
        Command::Serve(_) => server::serve(config).await,
    }
}

/// 生成一篇博客，打印正文并把Word文档复制到输出目录
async fn generate_once(config: Config, request: BlogRequest) -> Result<()> {
    let target = config.export_target();
    let workflow = BlogWorkflow::from_config(config);

    println!("✍️ Generating your blog post...");
    let report = workflow.execute(&request).await?;

    println!("\n## Generated Blog Post\n");
    println!("{}", report.draft.post);

    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {:?}", parent))?;
    }
    std::fs::copy(&report.document.path, &target)
        .with_context(|| format!("Failed to write {:?}", target))?;

    println!(
        "\n📄 Saved {} ({} paragraphs) to {}",
        report.document.file_name,
        report.document.paragraph_count,
        target.display()
    );
    if workflow.config().verbose {
        println!("{}", report.timing_report);
    }

    Ok(())
}
