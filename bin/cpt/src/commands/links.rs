use anyhow::Result;
use cpt_app::{LinkBackend, ProblemBackend, Session};
use cpt_store::{QuickLinkDraft, QuickLinkId};

use crate::{LinksCommand, OutputFormat, render};

pub async fn run<B>(session: &Session<B>, command: LinksCommand, format: OutputFormat) -> Result<()>
where
    B: ProblemBackend + LinkBackend,
{
    match command {
        LinksCommand::List => render::print_links(&session.links().await, format),
        LinksCommand::Add { name, url, logo } => {
            let link = session
                .add_link(QuickLinkDraft {
                    name,
                    url,
                    logo_svg: logo,
                })
                .await?;
            render::print_links(std::slice::from_ref(&link), format)
        }
        LinksCommand::Delete { id } => {
            session.delete_link(&QuickLinkId::from(id.as_str())).await?;
            Ok(())
        }
    }
}
