//! Theming events and their JSON-lines intake

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use area_color::Variant;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::material::service::{CacheStats, PublishedTheme};

/// Events consumed by the material service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MaterialEvent {
    /// A new wallpaper was set
    WallpaperChanged { path: PathBuf },
    /// Dark mode toggled
    DarkModeChanged { enabled: bool },
    /// Scheme variant changed; unknown names are rejected at parse time
    SchemeChanged { scheme: Variant },
    /// Compositor blur toggled
    BlurChanged { enabled: bool },
    /// Regenerate the current wallpaper even if nothing changed
    Regenerate,
    /// Drop cached schemes and template outputs
    ClearCache,
    /// Report cache statistics on the output stream
    Stats,
}

/// One JSON line on the output stream
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum MaterialUpdate<'a> {
    ThemePublished(&'a PublishedTheme),
    Stats(&'a CacheStats),
}

/// Forward one event per JSON line from `reader` until EOF or until the
/// receiver goes away. Malformed lines are logged and skipped.
pub async fn read_events<R>(reader: R, tx: mpsc::Sender<MaterialEvent>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<MaterialEvent>(line) {
            Ok(event) => {
                debug!("Received event: {:?}", event);
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Err(e) => warn!("Ignoring invalid event {:?}: {}", line, e),
        }
    }
    Ok(())
}

/// Write every published theme and stats snapshot to `writer` as JSON
/// lines, until the service drops both senders.
pub async fn write_updates<W>(
    mut writer: W,
    mut themes: watch::Receiver<Option<Arc<PublishedTheme>>>,
    mut stats: watch::Receiver<CacheStats>,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut themes_open = true;
    let mut stats_open = true;
    while themes_open || stats_open {
        let line = tokio::select! {
            changed = themes.changed(), if themes_open => {
                if changed.is_err() {
                    themes_open = false;
                    continue;
                }
                let theme = themes.borrow_and_update().clone();
                match theme {
                    Some(theme) => serde_json::to_string(&MaterialUpdate::ThemePublished(&theme))?,
                    None => continue,
                }
            }
            changed = stats.changed(), if stats_open => {
                if changed.is_err() {
                    stats_open = false;
                    continue;
                }
                let snapshot = stats.borrow_and_update().clone();
                serde_json::to_string(&MaterialUpdate::Stats(&snapshot))?
            }
        };
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_events() {
        let event: MaterialEvent =
            serde_json::from_str(r#"{"type": "WallpaperChanged", "path": "/walls/a.png"}"#).unwrap();
        assert_eq!(event, MaterialEvent::WallpaperChanged { path: PathBuf::from("/walls/a.png") });

        let event: MaterialEvent = serde_json::from_str(r#"{"type": "SchemeChanged", "scheme": "Fruit Salad"}"#).unwrap();
        assert_eq!(event, MaterialEvent::SchemeChanged { scheme: Variant::FruitSalad });

        let event: MaterialEvent = serde_json::from_str(r#"{"type": "Regenerate"}"#).unwrap();
        assert_eq!(event, MaterialEvent::Regenerate);
    }

    #[test]
    fn rejects_unknown_variant() {
        let result = serde_json::from_str::<MaterialEvent>(r#"{"type": "SchemeChanged", "scheme": "Nonexistent"}"#);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn reads_lines_and_skips_garbage() {
        let input = b"{\"type\": \"DarkModeChanged\", \"enabled\": false}\nnot json\n\n{\"type\": \"ClearCache\"}\n";
        let (tx, mut rx) = mpsc::channel(8);
        read_events(&input[..], tx).await.unwrap();
        assert_eq!(rx.recv().await, Some(MaterialEvent::DarkModeChanged { enabled: false }));
        assert_eq!(rx.recv().await, Some(MaterialEvent::ClearCache));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn parses_stats_request() {
        let event: MaterialEvent = serde_json::from_str(r#"{"type": "Stats"}"#).unwrap();
        assert_eq!(event, MaterialEvent::Stats);
    }

    #[tokio::test]
    async fn writes_tagged_update_lines() {
        use crate::material::ColorScheme;

        let (theme_tx, theme_rx) = watch::channel(None);
        let (stats_tx, stats_rx) = watch::channel(CacheStats::default());
        let (client, mut server) = tokio::io::duplex(64 * 1024);
        let writer = tokio::spawn(write_updates(client, theme_rx, stats_rx));

        theme_tx.send_replace(Some(Arc::new(PublishedTheme {
            wallpaper: PathBuf::from("/walls/a.png"),
            variant: Variant::TonalSpot,
            dark_mode: false,
            seed: 0xFF4285F4,
            colors: [("primary".to_string(), "#445E91".to_string())].into_iter().collect(),
            dark_colors: ColorScheme::default(),
        })));
        stats_tx.send_replace(CacheStats {
            generations: 3,
            ..Default::default()
        });
        drop(theme_tx);
        drop(stats_tx);
        writer.await.unwrap().unwrap();

        let mut out = String::new();
        tokio::io::AsyncReadExt::read_to_string(&mut server, &mut out).await.unwrap();
        let lines: Vec<serde_json::Value> = out.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 2);

        let theme = lines.iter().find(|l| l["type"] == "ThemePublished").unwrap();
        assert_eq!(theme["wallpaper"], "/walls/a.png");
        assert_eq!(theme["variant"], "Tonal Spot");
        assert_eq!(theme["colors"]["primary"], "#445E91");

        let stats = lines.iter().find(|l| l["type"] == "Stats").unwrap();
        assert_eq!(stats["generations"], 3);
        assert_eq!(stats["last_wallpaper"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn unpublished_theme_writes_nothing() {
        let (theme_tx, theme_rx) = watch::channel(None);
        let (stats_tx, stats_rx) = watch::channel(CacheStats::default());
        let (client, mut server) = tokio::io::duplex(1024);
        let writer = tokio::spawn(write_updates(client, theme_rx, stats_rx));

        theme_tx.send_replace(None);
        drop(theme_tx);
        drop(stats_tx);
        writer.await.unwrap().unwrap();

        let mut out = String::new();
        tokio::io::AsyncReadExt::read_to_string(&mut server, &mut out).await.unwrap();
        assert!(out.is_empty());
    }
}
