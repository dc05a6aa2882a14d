//! Sid command implementation.

use std::io::Write;

use ident_client::{IdentityClient, SidCreate, SidFilter, SidUpdate, find_sid};
use tracing::{debug, info};

use super::non_empty;
use crate::cli::{SidCommands, SidCreateArgs, SidSetArgs, enabled_flag};
use crate::error::CliError;
use crate::output::{Listing, Message, OutputFormat, Record};

/// Columns shown by `sid list`.
pub const LIST_COLUMNS: &[&str] = &["ID", "Name", "Enabled", "Description"];

/// Handler for sid subcommands.
pub struct SidCommand<'a, C> {
    client: &'a C,
}

impl<'a, C: IdentityClient> SidCommand<'a, C> {
    /// Creates a new sid command handler.
    #[must_use]
    pub const fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Executes the sid subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if the sid cannot be resolved, the service rejects the
    /// request, or output fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &SidCommands,
    ) -> Result<(), CliError> {
        match command {
            SidCommands::Create(args) => self.create(out, format, args).await,
            SidCommands::Delete { sid } => self.delete(sid).await,
            SidCommands::List => self.list(out, format).await,
            SidCommands::Set(args) => self.set(out, format, args).await,
            SidCommands::Show { sid } => self.show(out, format, sid).await,
        }
    }

    async fn create<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &SidCreateArgs,
    ) -> Result<(), CliError> {
        debug!(?args, "creating sid");

        let request = SidCreate {
            description: non_empty(args.description.as_ref()),
            enabled: !args.disable,
            members: (!args.members.is_empty()).then(|| args.members.clone()),
            ..SidCreate::new(&args.name)
        };

        let sid = self.client.create_sid(&request).await?;
        info!(id = %sid.id, name = %sid.name, "sid created");
        format.write_record(out, Record::from_resource(&sid))
    }

    async fn delete(&self, name_or_id: &str) -> Result<(), CliError> {
        debug!(sid = name_or_id, "deleting sid");

        let sid = find_sid(self.client, name_or_id).await?;
        self.client.delete_sid(&sid.id).await?;
        info!(id = %sid.id, "sid deleted");
        Ok(())
    }

    async fn list<W: Write>(&self, out: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        debug!("listing sids");

        let sids = self.client.list_sids(&SidFilter::default()).await?;
        format.write_listing(out, Listing::from_resources(LIST_COLUMNS, &sids))
    }

    async fn set<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &SidSetArgs,
    ) -> Result<(), CliError> {
        debug!(?args, "updating sid");

        let update = SidUpdate {
            name: non_empty(args.name.as_ref()),
            description: non_empty(args.description.as_ref()),
            enabled: enabled_flag(args.enable, args.disable),
            members: (!args.members.is_empty()).then(|| args.members.clone()),
        };

        if update.is_empty() {
            return format.write(out, &Message::info("Sid not updated, no arguments present"));
        }

        let sid = find_sid(self.client, &args.sid).await?;
        self.client.update_sid(&sid.id, &update).await?;
        info!(id = %sid.id, "sid updated");
        Ok(())
    }

    async fn show<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        name_or_id: &str,
    ) -> Result<(), CliError> {
        debug!(sid = name_or_id, "showing sid");

        let sid = find_sid(self.client, name_or_id).await?;
        format.write_record(out, Record::from_resource(&sid))
    }
}
