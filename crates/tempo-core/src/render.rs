use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::group::CategoryGroup;
use crate::view::ViewId;

const EXPANDED_MARK: &str = "▾";
const COLLAPSED_MARK: &str = "▸";

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    counts: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => io::stdout().is_terminal(),
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };
        let counts = cfg.get_bool("show.counts").unwrap_or(true);

        Ok(Self { color, counts })
    }

    pub fn plain() -> Self {
        Self {
            color: false,
            counts: true,
        }
    }

    /// Writes one view: a header per group, rows only for visible groups.
    #[tracing::instrument(skip(self, out, groups))]
    pub fn write_view<W: Write>(
        &self,
        mut out: W,
        view: ViewId,
        groups: &[CategoryGroup],
    ) -> anyhow::Result<()> {
        writeln!(out, "{}", self.paint(&format!("[{view}]"), "1"))?;
        if groups.is_empty() {
            writeln!(out, "  (no tasks)")?;
            return Ok(());
        }

        let title_width = groups
            .iter()
            .filter(|group| group.visible)
            .flat_map(|group| group.tasks.iter())
            .map(|task| UnicodeWidthStr::width(task.title.as_str()))
            .max()
            .unwrap_or(0);

        for group in groups {
            let mark = if group.visible {
                EXPANDED_MARK
            } else {
                COLLAPSED_MARK
            };
            let label = self.paint(group.key.as_str(), "36");
            if self.counts {
                writeln!(out, "{mark} {label} ({})", group.tasks.len())?;
            } else {
                writeln!(out, "{mark} {label}")?;
            }

            if !group.visible {
                continue;
            }
            for task in &group.tasks {
                let padding =
                    title_width.saturating_sub(UnicodeWidthStr::width(task.title.as_str()));
                let short_id: String = task.uuid.simple().to_string().chars().take(8).collect();
                writeln!(
                    out,
                    "    {}{} {}",
                    task.title,
                    " ".repeat(padding),
                    self.paint(&short_id, "33")
                )?;
            }
        }

        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}
