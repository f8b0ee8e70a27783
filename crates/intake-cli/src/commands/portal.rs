//! Portal access commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use intake_core::portal::model::{BirthInfo, ClientInfo, NewPortalAccess};
use std::path::Path;

use crate::output;

#[derive(Subcommand)]
pub enum PortalCommands {
    /// Create portal access for a client
    New(NewPortalArgs),

    /// List portal access records
    List,

    /// Show one portal access record
    Show {
        /// Portal access ID
        id: String,
    },
}

#[derive(Args)]
pub struct NewPortalArgs {
    /// Client first name
    #[arg(long)]
    pub first_name: String,

    /// Client last name
    #[arg(long)]
    pub last_name: String,

    /// Email address
    #[arg(long, default_value = "")]
    pub email: String,

    /// Phone number
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Case type
    #[arg(long, default_value = "general")]
    pub case_type: String,

    /// Lead this client came from
    #[arg(long)]
    pub lead_id: Option<String>,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub dob: Option<String>,

    /// Country of birth
    #[arg(long)]
    pub country: Option<String>,

    /// Preferred language
    #[arg(long)]
    pub language: Option<String>,
}

impl NewPortalArgs {
    fn into_new_access(self) -> NewPortalAccess {
        let birth_info = (self.dob.is_some() || self.country.is_some() || self.language.is_some()).then(|| {
            BirthInfo {
                date_of_birth: self.dob,
                country_of_birth: self.country,
                languages: self.language.iter().cloned().collect(),
                preferred_language: self.language,
                ..BirthInfo::default()
            }
        });

        NewPortalAccess {
            lead_id: self.lead_id,
            client_info: ClientInfo {
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
                phone: self.phone,
            },
            birth_info,
            image_url: None,
            case_type: self.case_type,
        }
    }
}

pub async fn execute(cmd: PortalCommands, project_dir: &Path) -> Result<()> {
    let (_config, pool) = super::connect(project_dir).await?;

    match cmd {
        PortalCommands::New(args) => {
            let access = intake_core::portal::create_portal_access(&pool, args.into_new_access()).await?;
            println!(
                "{} Portal access for {} ({})",
                "✓".green().bold(),
                access.full_name().cyan(),
                access.id.dimmed()
            );
            println!(
                "  {} intake questionnaire fill {}",
                "Next:".dimmed(),
                access.id
            );
        }

        PortalCommands::List => {
            let records = intake_core::portal::list_portal_access(&pool).await?;
            output::print_portals_table(&records);
        }

        PortalCommands::Show { id } => {
            let access = intake_core::portal::get_portal_access(&pool, &id).await?;
            output::print_portal(&access);
        }
    }

    Ok(())
}
