//! Sip command implementation.

use std::io::Write;

use ident_client::{IdentityClient, SidId, SipCreate, SipFilter, SipUpdate, find_sid, find_sip};
use tracing::{debug, info};

use super::non_empty;
use crate::cli::{SipCommands, SipCreateArgs, SipSetArgs, enabled_flag};
use crate::error::CliError;
use crate::output::{Listing, Message, OutputFormat, Record};
use crate::properties::collect_properties;

/// Columns shown by `sip list`.
pub const LIST_COLUMNS: &[&str] = &["ID", "Name"];

/// Columns shown by `sip list --long`.
pub const LONG_LIST_COLUMNS: &[&str] = &["ID", "Name", "Sid ID", "Description", "Enabled"];

/// Handler for sip subcommands.
pub struct SipCommand<'a, C> {
    client: &'a C,
}

impl<'a, C: IdentityClient> SipCommand<'a, C> {
    /// Creates a new sip command handler.
    #[must_use]
    pub const fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Executes the sip subcommand.
    ///
    /// # Errors
    ///
    /// Returns error if a sip or sid cannot be resolved, a property is
    /// invalid, the service rejects the request, or output fails.
    pub async fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        command: &SipCommands,
    ) -> Result<(), CliError> {
        match command {
            SipCommands::Create(args) => self.create(out, format, args).await,
            SipCommands::Delete { sip } => self.delete(sip).await,
            SipCommands::List { long, sid } => {
                self.list(out, format, *long, sid.as_deref()).await
            }
            SipCommands::Set(args) => self.set(out, format, args).await,
            SipCommands::Show { sip } => self.show(out, format, sip).await,
        }
    }

    async fn resolve_sid(&self, sid: Option<&str>) -> Result<Option<SidId>, CliError> {
        match sid.filter(|s| !s.is_empty()) {
            Some(name_or_id) => Ok(Some(find_sid(self.client, name_or_id).await?.id)),
            None => Ok(None),
        }
    }

    async fn create<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &SipCreateArgs,
    ) -> Result<(), CliError> {
        debug!(?args, "creating sip");

        let properties = collect_properties(&args.properties)?;
        let sid_id = self.resolve_sid(args.sid.as_deref()).await?;

        let request = SipCreate {
            description: non_empty(args.description.as_ref()),
            enabled: !args.disable,
            sid_id,
            properties,
            ..SipCreate::new(&args.name)
        };

        let sip = self.client.create_sip(&request).await?;
        info!(id = %sip.id, name = %sip.name, "sip created");
        format.write_record(out, Record::from_resource(&sip))
    }

    async fn delete(&self, name_or_id: &str) -> Result<(), CliError> {
        debug!(sip = name_or_id, "deleting sip");

        let sip = find_sip(self.client, name_or_id).await?;
        self.client.delete_sip(&sip.id).await?;
        info!(id = %sip.id, "sip deleted");
        Ok(())
    }

    async fn list<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        long: bool,
        sid: Option<&str>,
    ) -> Result<(), CliError> {
        debug!(long, ?sid, "listing sips");

        let filter = SipFilter {
            sid_id: self.resolve_sid(sid).await?,
            ..SipFilter::default()
        };
        let sips = self.client.list_sips(&filter).await?;

        let columns = if long { LONG_LIST_COLUMNS } else { LIST_COLUMNS };
        format.write_listing(out, Listing::from_resources(columns, &sips))
    }

    async fn set<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &SipSetArgs,
    ) -> Result<(), CliError> {
        debug!(?args, "updating sip");

        let mut update = SipUpdate {
            name: non_empty(args.name.as_ref()),
            description: non_empty(args.description.as_ref()),
            enabled: enabled_flag(args.enable, args.disable),
            sid_id: None,
            properties: collect_properties(&args.properties)?,
        };

        if update.is_empty() && non_empty(args.sid.as_ref()).is_none() {
            return format.write(out, &Message::info("Sip not updated, no arguments present"));
        }

        let sip = find_sip(self.client, &args.sip).await?;
        update.sid_id = self.resolve_sid(args.sid.as_deref()).await?;
        self.client.update_sip(&sip.id, &update).await?;
        info!(id = %sip.id, "sip updated");
        Ok(())
    }

    async fn show<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        name_or_id: &str,
    ) -> Result<(), CliError> {
        debug!(sip = name_or_id, "showing sip");

        let sip = find_sip(self.client, name_or_id).await?;
        format.write_record(out, Record::from_resource(&sip))
    }
}
