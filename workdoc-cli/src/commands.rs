//! Command handlers.

use std::path::Path;

use anyhow::{bail, Context};
use serde::Serialize;
use serde_json::json;

use workdoc_app::{AppConfig, AppState};
use workdoc_core::types::{DocumentRequest, DocumentType};
use workdoc_core::utils::slug::{generate_slug, is_reserved_slug, is_valid_slug};

use crate::cli::{
    CardCommand, Command, CompanyCommand, DnsCommand, DocumentCommand, GenerateArgs, PoolCommand,
};

pub async fn execute(command: Command, config: &AppConfig, db_path: &Path) -> anyhow::Result<()> {
    // slug 计算不需要打开数据库
    if let Command::Slug { name } = &command {
        let slug = generate_slug(name);
        return print_json(&json!({
            "name": name,
            "slug": slug,
            "valid": is_valid_slug(&slug),
            "reserved": is_reserved_slug(&slug),
        }));
    }

    let state = AppState::from_config(config, db_path)
        .await
        .with_context(|| format!("failed to open {}", db_path.display()))?;

    match command {
        Command::Pool(cmd) => pool(&state, cmd).await,
        Command::Company(cmd) => company(&state, cmd).await,
        Command::Dns(cmd) => dns(&state, cmd).await,
        Command::Card(cmd) => card(&state, cmd).await,
        Command::Document(cmd) => document(&state, cmd).await,
        Command::Slug { .. } => Ok(()),
    }
}

async fn pool(state: &AppState, command: PoolCommand) -> anyhow::Result<()> {
    let service = &state.subdomain_service;
    match command {
        PoolCommand::Stats => print_json(&service.get_pool_stats().await?),
        PoolCommand::Expand { count } => {
            let result = service.expand_subdomain_pool(count).await?;
            print_json(&result)?;
            if !result.failed.is_empty() {
                bail!("{} of {count} names could not be created", result.failed.len());
            }
            Ok(())
        }
        PoolCommand::Setup { names } => {
            let result = service.setup_pool(&names).await?;
            print_json(&result)?;
            if !result.failed.is_empty() {
                bail!("{} names could not be added", result.failed.len());
            }
            Ok(())
        }
    }
}

async fn company(state: &AppState, command: CompanyCommand) -> anyhow::Result<()> {
    match command {
        CompanyCommand::Register { name } => {
            print_json(&state.company_service.register_company(&name).await?)
        }
        CompanyCommand::Show { id } => print_json(&state.company_service.get_company(id).await?),
        CompanyCommand::SetSubdomain { id, slug } => {
            let updated = state
                .subdomain_service
                .update_company_subdomain(id, &slug)
                .await?;
            print_json(&state.company_service.get_company(id).await?)?;
            if !updated {
                bail!("company {id} was not moved to '{slug}'");
            }
            Ok(())
        }
        CompanyCommand::Failed => {
            print_json(&state.subdomain_service.list_failed_provisioning().await?)
        }
        CompanyCommand::Retry { id } => {
            let provisioned = state.subdomain_service.retry_provisioning(id).await?;
            print_json(&state.company_service.get_company(id).await?)?;
            if !provisioned {
                bail!("provisioning for company {id} failed again");
            }
            Ok(())
        }
    }
}

async fn dns(state: &AppState, command: DnsCommand) -> anyhow::Result<()> {
    let provider = state.ctx.dns_provider()?;
    match command {
        DnsCommand::Test => {
            let connected = provider.test_connection().await?;
            print_json(&json!({
                "provider": provider.id(),
                "domain": provider.target().domain,
                "connected": connected,
            }))?;
            if !connected {
                bail!("{} rejected the credentials or zone", provider.id());
            }
            Ok(())
        }
        DnsCommand::List => print_json(&provider.list_subdomains().await?),
    }
}

async fn card(state: &AppState, command: CardCommand) -> anyhow::Result<()> {
    let CardCommand::Verify { image, media_type } = command;
    let media_type = match media_type {
        Some(media_type) => media_type,
        None => guess_media_type(&image)
            .with_context(|| format!("cannot tell the image type of {}", image.display()))?
            .to_string(),
    };
    let bytes = tokio::fs::read(&image)
        .await
        .with_context(|| format!("failed to read {}", image.display()))?;

    print_json(
        &state
            .card_verification_service
            .verify_card_image(&bytes, &media_type)
            .await?,
    )
}

async fn document(state: &AppState, command: DocumentCommand) -> anyhow::Result<()> {
    match command {
        DocumentCommand::Generate(args) => {
            let company_id = args.company_id;
            let request = document_request(args)?;
            print_json(
                &state
                    .document_service
                    .generate_document(company_id, request)
                    .await?,
            )
        }
        DocumentCommand::List { company_id } => {
            print_json(&state.document_service.list_documents(company_id).await?)
        }
    }
}

fn document_request(args: GenerateArgs) -> anyhow::Result<DocumentRequest> {
    let document_type = args
        .document_type
        .parse::<DocumentType>()
        .map_err(anyhow::Error::msg)?;

    let mut request = DocumentRequest::new(document_type);
    request.project_name = args.project;
    request.site_address = args.site;
    request.trade = args.trade;
    request.additional_details = args.details;
    Ok(request)
}

fn guess_media_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
