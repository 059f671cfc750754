use console_client::{AdminClient, ListPage, Page};
use console_core::consumer::Consumer;
use console_core::consumer_group::ConsumerGroup;
use console_core::format::format_timestamp;
use console_core::global_rule::GlobalRule;
use console_core::owner::resource_body;
use console_core::plugin_config::PluginConfig;
use console_core::resource::Resource;
use console_core::ssl::SslCertificate;
use console_core::upstream::Upstream;
use console_core::{ResourceKind, Route};
use std::path::Path;

pub async fn list(client: &AdminClient, kind: ResourceKind, page: Page, json: bool) -> anyhow::Result<()> {
    let result = client.resource(kind).list(page).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result.items)?);
        return Ok(());
    }

    let rows = match kind {
        ResourceKind::Routes => rows::<Route>(&result),
        ResourceKind::Upstreams => rows::<Upstream>(&result),
        ResourceKind::Consumers => rows::<Consumer>(&result),
        ResourceKind::ConsumerGroups => rows::<ConsumerGroup>(&result),
        ResourceKind::Ssls => rows::<SslCertificate>(&result),
        ResourceKind::PluginConfigs => rows::<PluginConfig>(&result),
        ResourceKind::GlobalRules => rows::<GlobalRule>(&result),
    };
    print!("{}", render_table(&rows));
    println!("{} of {} {}", result.items.len(), result.total, kind);
    Ok(())
}

pub async fn get(client: &AdminClient, kind: ResourceKind, id: &str) -> anyhow::Result<()> {
    let body = client.resource(kind).get(id).await?;
    println!("{}", serde_json::to_string_pretty(resource_body(&body))?);
    Ok(())
}

pub async fn put(client: &AdminClient, kind: ResourceKind, id: Option<&str>, file: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)?;
    let body: serde_json::Value = serde_json::from_str(&text)?;
    let saved = client.resource(kind).create(id, &body).await?;
    println!("{}", serde_json::to_string_pretty(resource_body(&saved))?);
    Ok(())
}

pub async fn delete(client: &AdminClient, kind: ResourceKind, id: &str) -> anyhow::Result<()> {
    client.resource(kind).delete(id).await?;
    println!("deleted {kind}/{id}");
    Ok(())
}

/// (id, label, last update) for each item that decodes as `T`.
fn rows<T: Resource>(page: &ListPage) -> Vec<[String; 3]> {
    page.typed::<T>()
        .iter()
        .map(|r| {
            [
                r.id().unwrap_or("-").to_string(),
                r.label(),
                format_timestamp(r.update_time()),
            ]
        })
        .collect()
}

fn render_table(rows: &[[String; 3]]) -> String {
    let header = ["ID".to_string(), "NAME".to_string(), "UPDATED".to_string()];
    let mut widths = [0usize; 3];
    for row in std::iter::once(&header).chain(rows) {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let mut out = String::new();
    for row in std::iter::once(&header).chain(rows) {
        out.push_str(&format!(
            "{:<w0$}  {:<w1$}  {}\n",
            row[0],
            row[1],
            row[2],
            w0 = widths[0],
            w1 = widths[1]
        ));
    }
    out
}
