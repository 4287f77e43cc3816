use crate::cli::{AddArgs, Command};
use anyhow::{Context, Result};
use vizwalk_catalog::prelude::*;
use vizwalk_catalog::{format_area, resolve, VideoTarget};

fn context(privileged: bool) -> ExecutionContext {
    if privileged {
        ExecutionContext::host()
    } else {
        ExecutionContext::browser()
    }
}

fn draft_from(catalog: &Catalog, args: AddArgs) -> ProjectDraft {
    let mut draft = catalog
        .draft()
        .named(args.project_name, args.build_name)
        .with_launch_ref(args.launch_ref);
    if let Some(category) = args.category {
        draft = draft.with_category(category);
    }
    if let Some(version) = args.build_version {
        draft.build_version = version;
    }
    draft.area_sqft = args.area_sqft;
    draft.industry = args.industry;
    draft.design_style = args.design_style;
    draft.thumbnail_ref = args.thumbnail_ref;
    draft.video_ref = args.video_ref;
    draft.external_viewer_id = args.external_viewer_id;
    draft
}

fn print_groups(catalog: &Catalog, query: &str) {
    let groups = catalog.view(query);
    if groups.is_empty() {
        println!("No projects");
        return;
    }
    for group in groups {
        println!("{} ({})", group.key, group.len());
        for record in group.records {
            println!(
                "  {:<32} {:<20} {}",
                record.slot_id,
                record.project_name,
                record.build_label(&catalog.config().fallback_build_label)
            );
        }
    }
}

fn print_record(catalog: &Catalog, record: &ProjectRecord, ctx: &ExecutionContext) {
    let launcher = catalog.launcher();
    println!("Slot:      {}", record.slot_id);
    println!("Project:   {}", record.project_name);
    println!("Build:     {} {}", record.build_name, record.build_version);
    println!("Category:  {}", record.category);
    println!("Area:      {}", format_area(&record.area_sqft));
    println!("Industry:  {}", record.industry);
    println!("Style:     {}", record.design_style);
    if !record.thumbnail_ref.trim().is_empty() {
        println!("Thumbnail: {}", resolve(&record.thumbnail_ref, ctx));
    }
    match launcher.build_video_launch(record, ctx) {
        Some(VideoTarget::ExternalPlayer { reference }) => println!("Video:     player {reference}"),
        Some(VideoTarget::Browser { url }) => println!("Video:     {url}"),
        None => {}
    }
    if let Some(link) = launcher.external_viewer_link(record) {
        println!("Viewer:    {link}");
    }
}

/// Run one subcommand against an opened catalog
pub(crate) async fn run(catalog: &mut Catalog, command: Command) -> Result<()> {
    match command {
        Command::List { query } => print_groups(catalog, &query),
        Command::Add(args) => {
            let draft = draft_from(catalog, args);
            let record = catalog.add(draft).await.context("project not added")?;
            println!("{}", record.slot_id);
        }
        Command::Clear => {
            if catalog.clear().await {
                println!("Catalog cleared");
            } else {
                println!("Catalog already empty");
            }
        }
        Command::Launch {
            slot_id,
            privileged,
        } => {
            let target = catalog
                .launch(&slot_id, &context(privileged))
                .with_context(|| format!("cannot launch {slot_id}"))?;
            if target.is_executable() {
                println!("exec {}", target.reference());
            } else {
                println!("{}", target.reference());
            }
        }
        Command::Gallery { slot_id } => {
            println!("{}", catalog.gallery(&slot_id)?);
        }
        Command::Show {
            slot_id,
            privileged,
        } => {
            let record = catalog
                .find(&slot_id)
                .with_context(|| format!("no project with slot id {slot_id}"))?;
            print_record(catalog, record, &context(privileged));
        }
        Command::Resolve {
            reference,
            privileged,
        } => println!("{}", resolve(&reference, &context(privileged))),
        Command::FormatArea { text } => println!("{}", format_area(&text)),
    }
    Ok(())
}
