//! Ratatui-based dashboard.
//!
//! Shows the three chart panels stacked vertically with a header that reports
//! where each input came from. Inputs are fetched once and cached; toggling
//! derivation settings re-derives from the cache, `r` refetches.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::pipeline::{self, FetchedInputs};
use crate::data::EcbClient;
use crate::domain::{LengthPolicy, SimulationConfig, SimulationOutput, ZeroPotentialPolicy};
use crate::error::AppError;
use crate::plot::{DEFAULT_CHART_SIZE, build_panels, monthly_axis, write_chart_svg};

mod plotters_chart;

use plotters_chart::PanelChart;

/// Start the dashboard.
pub fn run(config: SimulationConfig, chart_path: PathBuf) -> Result<(), AppError> {
    config.validate()?;
    let client = EcbClient::from_env(config.base_url.as_deref())?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, client, chart_path);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: SimulationConfig,
    client: EcbClient,
    chart_path: PathBuf,
    status: String,
    inputs: Option<FetchedInputs>,
    output: Option<SimulationOutput>,
}

impl App {
    fn new(config: SimulationConfig, client: EcbClient, chart_path: PathBuf) -> Self {
        Self {
            config,
            client,
            chart_path,
            status: "Fetching ECB data...".to_string(),
            inputs: None,
            output: None,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        // Draw the "fetching" screen before blocking on the network.
        terminal
            .draw(|f| self.draw(f))
            .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
        self.refetch();

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the dashboard should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('r') => self.refetch(),
            KeyCode::Char('p') => {
                self.config.length_policy = match self.config.length_policy {
                    LengthPolicy::Truncate => LengthPolicy::PadLast,
                    LengthPolicy::PadLast => LengthPolicy::Truncate,
                };
                self.rederive();
                self.status = format!("length policy: {:?}", self.config.length_policy);
            }
            KeyCode::Char('z') => {
                self.config.zero_potential = match self.config.zero_potential {
                    ZeroPotentialPolicy::Nan => ZeroPotentialPolicy::Zero,
                    ZeroPotentialPolicy::Zero => ZeroPotentialPolicy::Nan,
                };
                self.rederive();
                self.status = format!("zero potential GDP: {:?}", self.config.zero_potential);
            }
            KeyCode::Char('g') => {
                self.config.upsample_gdp = !self.config.upsample_gdp;
                self.rederive();
                self.status = format!("upsample GDP: {}", self.config.upsample_gdp);
            }
            KeyCode::Char('s') => self.save_chart(),
            _ => {}
        }
        false
    }

    fn refetch(&mut self) {
        let inputs = pipeline::fetch_inputs(&self.client, &self.config);
        let defaulted = inputs.provenance().entries().iter().filter(|(_, s)| s.is_defaulted()).count();
        self.inputs = Some(inputs);
        self.rederive();
        self.status = if defaulted == 0 {
            "Fetched all inputs.".to_string()
        } else {
            format!("Fetched with {defaulted} input(s) on defaults.")
        };
    }

    fn rederive(&mut self) {
        if let Some(inputs) = &self.inputs {
            self.output = Some(pipeline::derive(inputs.clone(), &self.config));
        }
    }

    fn save_chart(&mut self) {
        let Some(output) = &self.output else {
            self.status = "Nothing to save yet.".to_string();
            return;
        };
        self.status = match write_chart_svg(&self.chart_path, output, self.config.epoch, DEFAULT_CHART_SIZE) {
            Ok(()) => format!("Wrote chart: {}", self.chart_path.display()),
            Err(err) => format!("Chart write failed: {err}"),
        };
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_panels(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("taylor", Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                " | r*={:.2} | π*={:.2} | n={}",
                self.config.equilibrium_rate,
                self.config.target_inflation,
                self.output.as_ref().map(SimulationOutput::len).unwrap_or(0),
            )),
        ]));

        if let Some(output) = &self.output {
            let spans: Vec<Span> = output
                .provenance
                .entries()
                .iter()
                .flat_map(|(name, status)| {
                    let color = if status.is_defaulted() { Color::Yellow } else { Color::Green };
                    let word = if status.is_defaulted() { "default" } else { "fetched" };
                    [
                        Span::styled(format!("{name}: "), Style::default().fg(Color::Gray)),
                        Span::styled(format!("{word}  "), Style::default().fg(color)),
                    ]
                })
                .collect();
            lines.push(Line::from(spans));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(p, area);
    }

    fn draw_panels(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(output) = &self.output else {
            let msg = Paragraph::new("Waiting for data...").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, area);
            return;
        };

        let panels = build_panels(output);
        let axis = monthly_axis(self.config.epoch, output.len());
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
            .split(area);

        for (panel, rect) in panels.iter().zip(rows.iter()) {
            let title = panel
                .lines
                .iter()
                .map(|l| l.label.as_str())
                .collect::<Vec<_>>()
                .join(" / ");
            let block = Block::default()
                .title(format!("{} [{title}]", panel.caption))
                .borders(Borders::ALL);
            let inner = block.inner(*rect);
            frame.render_widget(block, *rect);
            frame.render_widget(Clear, inner);
            frame.render_widget(PanelChart { panel, axis: &axis }, inner);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "r refetch | p length policy | z zero-potential policy | g upsample GDP | s save SVG | q quit";
        let p = Paragraph::new(Text::from(vec![
            Line::from(Span::styled(self.status.as_str(), Style::default().fg(Color::White))),
            Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))),
        ]))
        .block(Block::default().borders(Borders::TOP));
        frame.render_widget(p, area);
    }
}
