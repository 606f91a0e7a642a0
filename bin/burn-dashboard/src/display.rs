//! Terminal rendering of a [`DashboardView`].
//!
//! The same lines back the interactive screen and the one-shot `status`
//! output, only the interactive screen adds color and key hints.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::dashboard::{ActionView, BurnRow, DashboardView, StatView};

const GREEN: Color = Color::Green;
const RED: Color = Color::Red;
const YELLOW: Color = Color::Yellow;
const ORANGE: Color = Color::DarkYellow;
const DIM: Color = Color::DarkGrey;

/// One rendered line with an optional color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub color: Option<Color>,
}

impl Line {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }

    fn blank() -> Self {
        Self::plain("")
    }
}

fn header(title: &str) -> Vec<Line> {
    vec![
        Line::plain("+-----------------------------------------------------------------+"),
        Line::plain(format!("|  {title:<63}|")),
        Line::plain("+-----------------------------------------------------------------+"),
    ]
}

fn stat_line(label: &str, stat: &StatView, suffix: &str) -> Line {
    let mut text = format!("  {label:<16}{}{suffix}", stat.value);
    if !stat.share.is_empty() {
        text.push_str("  ");
        text.push_str(&stat.share);
    }
    if let Some(usd) = &stat.usd {
        text.push_str(&format!("  ~{usd}"));
    }
    Line::plain(text)
}

/// Stats and burn status, without the history table.
pub fn status_lines(view: &DashboardView) -> Vec<Line> {
    let symbol = &view.symbol;
    let mut lines = header(&format!("{symbol} BURNER"));
    lines.push(Line::blank());

    let mut total = format!("  Total {symbol} burned forever: {}", view.total_burned.value);
    if !view.total_burned.share.is_empty() {
        total.push_str(&format!("  {}", view.total_burned.share));
    }
    lines.push(Line::colored(total, ORANGE));
    lines.push(Line::blank());

    lines.push(stat_line("Burn rate", &view.burn_rate, "/hr"));
    lines.push(stat_line("Caller reward", &view.caller_reward, ""));
    lines.push(stat_line("Contract balance", &view.contract_balance, ""));
    lines.push(Line::plain(format!("  {:<16}{}", "Total burns", view.total_burns)));
    lines.push(Line::plain(format!("  {:<16}{}", "Price", view.price)));
    if let Some(owner) = &view.owner {
        lines.push(Line::plain(format!("  {:<16}{owner}", "Owner")));
    }
    lines.push(Line::blank());

    if view.burns_enabled {
        lines.push(Line::colored("  [+] Burns Active", GREEN));
        let mut pending = format!("  Pending burn amount: {} {symbol}", view.pending_burn.value);
        if !view.pending_burn.share.is_empty() {
            pending.push_str(&format!("  {}", view.pending_burn.share));
        }
        if let Some(usd) = &view.pending_burn.usd {
            pending.push_str(&format!("  ~{usd}"));
        }
        lines.push(Line::colored(pending, ORANGE));
        if let Some(next) = &view.next_burn_in {
            lines.push(Line::plain(format!("  Next burn eligible in {next}")));
        }
    } else {
        lines.push(Line::colored("  [-] Burns Paused", RED));
    }
    if let Some(since) = &view.since_last_burn {
        let text = if since == "now" {
            "  Last burn: just now".to_string()
        } else {
            format!("  Last burn: {since} ago")
        };
        lines.push(Line::colored(text, DIM));
    }
    lines
}

/// The action control and wallet line.
pub fn action_lines(view: &DashboardView) -> Vec<Line> {
    let mut lines = vec![Line::blank()];
    let (key, color) = match &view.action {
        ActionView::Connect { .. } => ("", DIM),
        ActionView::Switch { .. } => ("(s) ", YELLOW),
        ActionView::Burn { .. } => ("(b) ", ORANGE),
    };
    let color = if view.action.enabled() { color } else { DIM };
    lines.push(Line::colored(
        format!("  {key}[ {} ]", view.action.label()),
        color,
    ));
    if let (Some(wallet), ActionView::Burn { .. }) = (&view.wallet, &view.action) {
        lines.push(Line::colored(
            format!(
                "  Wallet {wallet} earns {} {} {} per burn call",
                view.caller_reward.value, view.symbol, view.caller_reward.share
            ),
            DIM,
        ));
    }
    lines
}

/// The recent burns table, newest first.
pub fn history_lines(rows: &[BurnRow]) -> Vec<Line> {
    let mut lines = vec![
        Line::plain("  Recent Burns"),
        Line::plain(format!(
            "  {:<16} {:>10} {:>10} {:>12}",
            "Caller", "Burned", "Reward", "Block"
        )),
        Line::plain(format!("  {}", "-".repeat(51))),
    ];
    if rows.is_empty() {
        lines.push(Line::colored("  no burns yet", DIM));
    }
    for row in rows {
        lines.push(Line::plain(format!(
            "  {:<16} {:>10} {:>10} {:>12}",
            row.caller, row.burned, row.reward, row.block
        )));
    }
    lines
}

/// Lines without color, joined for stdout.
pub fn to_plain(lines: &[Line]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.text);
        out.push('\n');
    }
    out
}

/// Redraws the whole interactive screen.
pub fn draw<W: Write>(out: &mut W, view: &DashboardView) -> io::Result<()> {
    let mut lines = status_lines(view);
    lines.extend(action_lines(view));
    lines.push(Line::blank());
    lines.extend(history_lines(&view.recent_burns));
    lines.push(Line::blank());
    lines.push(Line::colored("  b burn   s switch network   q quit", DIM));

    queue!(out, Clear(ClearType::All))?;
    for (row, line) in lines.iter().enumerate() {
        queue!(out, MoveTo(0, row as u16))?;
        match line.color {
            Some(color) => queue!(
                out,
                SetForegroundColor(color),
                Print(&line.text),
                ResetColor
            )?,
            None => queue!(out, Print(&line.text))?,
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> DashboardView {
        DashboardView {
            symbol: "CLAWD".to_string(),
            total_burned: StatView {
                value: "2.50M".to_string(),
                share: "(0.250% of supply)".to_string(),
                usd: None,
            },
            burn_rate: StatView::default(),
            caller_reward: StatView::default(),
            contract_balance: StatView::default(),
            total_burns: "3".to_string(),
            burns_enabled: true,
            pending_burn: StatView {
                value: "1,234".to_string(),
                ..Default::default()
            },
            next_burn_in: None,
            since_last_burn: Some("2m 5s".to_string()),
            price: "-".to_string(),
            owner: None,
            wallet: None,
            action: ActionView::Connect {
                label: "Connect wallet to burn".to_string(),
            },
            recent_burns: vec![],
        }
    }

    #[test]
    fn status_mentions_key_figures() {
        let text = to_plain(&status_lines(&view()));
        assert!(text.contains("Total CLAWD burned forever: 2.50M  (0.250% of supply)"));
        assert!(text.contains("Burns Active"));
        assert!(text.contains("Pending burn amount: 1,234 CLAWD"));
        assert!(text.contains("Last burn: 2m 5s ago"));
    }

    #[test]
    fn paused_hides_pending() {
        let view = DashboardView {
            burns_enabled: false,
            ..view()
        };
        let text = to_plain(&status_lines(&view));
        assert!(text.contains("Burns Paused"));
        assert!(!text.contains("Pending burn amount"));
    }

    #[test]
    fn history_lists_rows_in_given_order() {
        let rows = vec![
            BurnRow {
                caller: "0xaaaa...aaaa".to_string(),
                burned: "1.0K".to_string(),
                reward: "5".to_string(),
                block: 20,
            },
            BurnRow {
                caller: "0xbbbb...bbbb".to_string(),
                burned: "2.0K".to_string(),
                reward: "5".to_string(),
                block: 10,
            },
        ];
        let lines = history_lines(&rows);
        assert_eq!(lines.len(), 5);
        assert!(lines[3].text.contains("0xaaaa...aaaa"));
        assert!(lines[4].text.ends_with("10"));
    }

    #[test]
    fn draw_writes_to_any_writer() {
        let mut buf = Vec::new();
        draw(&mut buf, &view()).unwrap();
        let out = String::from_utf8_lossy(&buf);
        assert!(out.contains("Connect wallet to burn"));
    }
}
