use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use portfolio_tui::style::{gradient_stops, parse_color};
use portfolio_tui::StyleRoot;

use crate::app::{settings_entries, App, EditTarget, Route, SettingsEntry, CONTACT_FIELD_KEYS};

/// Colors resolved from the published style variables.
struct Palette {
    primary: Color,
    secondary: Color,
    tertiary: Color,
    light: Color,
    border: Color,
    sidebar_bg: Color,
    page_bg: Color,
}

fn rgb(value: Option<(u8, u8, u8)>) -> Color {
    value.map(|(r, g, b)| Color::Rgb(r, g, b)).unwrap_or(Color::Reset)
}

impl Palette {
    fn from_style(style: &StyleRoot) -> Self {
        // The page gradient fades to near-black at 70%; that stop is the
        // readable background in a terminal.
        let page_bg = style
            .get("gradient-bg")
            .map(|g| gradient_stops(&g))
            .and_then(|stops| stops.into_iter().find(|(_, pct)| *pct == 70))
            .and_then(|(color, _)| parse_color(&color));

        Palette {
            primary: rgb(style.rgb("primary-color")),
            secondary: rgb(style.rgb("secondary-color")),
            tertiary: rgb(style.rgb("tertiary-color")),
            light: rgb(style.rgb("light-color")),
            border: rgb(style.rgb("border-color")),
            sidebar_bg: rgb(style.rgb("sidebar-gradient")),
            page_bg: rgb(page_bg),
        }
    }
}

pub fn render_ui(f: &mut Frame, app: &App) {
    let palette = Palette::from_style(&app.style);
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(size);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(20)])
        .split(chunks[0]);

    render_sidebar(f, app, &palette, main_chunks[0]);

    let page_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.page_bg))
        .title(Span::styled(
            format!(" {} ", app.route.path()),
            Style::default().fg(palette.light),
        ));
    let page_area = page_block.inner(main_chunks[1]);
    f.render_widget(page_block, main_chunks[1]);

    match app.route {
        Route::Profile => render_profile(f, app, &palette, page_area),
        Route::Projects => render_projects(f, app, &palette, page_area),
        Route::CurrentProject => render_current_project(f, app, &palette, page_area),
        Route::Contact => render_contact(f, app, &palette, page_area),
        Route::Settings => render_settings(f, app, &palette, page_area),
    }

    let status = Paragraph::new(app.status_message.as_str())
        .style(Style::default().fg(palette.light))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.border))
                .title(" Status "),
        );
    f.render_widget(status, chunks[1]);

    if app.show_help {
        render_help(f, &palette, size);
    }
}

fn render_sidebar(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.sidebar_bg));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(5), Constraint::Length(2)])
        .split(inner);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            app.profile.name.as_str(),
            Style::default().fg(palette.light).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(app.profile.title.as_str(), Style::default().fg(Color::Gray))),
    ])
    .wrap(Wrap { trim: true });
    f.render_widget(header, rows[0]);

    let items: Vec<ListItem> = Route::ALL
        .iter()
        .enumerate()
        .map(|(i, route)| {
            let label = format!(" {} {}", i + 1, app.t(route.label_key()));
            let style = if *route == app.route {
                Style::default().fg(palette.primary).add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(label).style(style)
        })
        .collect();
    f.render_widget(List::new(items), rows[1]);

    let footer = Paragraph::new(app.t("alwaysLearning"))
        .style(Style::default().fg(palette.secondary).add_modifier(Modifier::ITALIC))
        .wrap(Wrap { trim: true });
    f.render_widget(footer, rows[2]);
}

fn heading<'a>(text: String, palette: &Palette) -> Line<'a> {
    Line::from(Span::styled(text, Style::default().fg(palette.primary).add_modifier(Modifier::BOLD)))
}

fn bullet<'a>(text: String) -> Line<'a> {
    Line::from(format!("  • {}", text))
}

fn render_profile(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let skills = ["Python", "JavaScript", "React", "Node.js", "SQL", "Pandas", "Git", "Docker"];
    let mut lines = vec![
        Line::from(Span::styled(app.t("welcomeHey"), Style::default().fg(palette.secondary))),
        Line::from(Span::styled(
            app.t("welcomeTitle"),
            Style::default().fg(palette.light).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{} {}", app.t("welcomeTo"), app.t("welcomeName"))),
        Line::from(""),
        Line::from(app.t("profileSubtitle")),
        Line::from(""),
        heading(app.t("aboutMe"), palette),
        Line::from(app.t("aboutMeText")),
        Line::from(""),
        heading(app.t("technicalSkills"), palette),
        Line::from(Span::styled(skills.join("  ·  "), Style::default().fg(palette.tertiary))),
        Line::from(""),
        heading(app.t("myMindset"), palette),
    ];
    for (title, text) in [
        ("projectDriven", "projectDrivenText"),
        ("innovationFocused", "innovationFocusedText"),
        ("alwaysLearning", "alwaysLearningText"),
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}: ", app.t(title)), Style::default().fg(palette.light)),
            Span::raw(app.t(text)),
        ]));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_projects(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let projects = [
        ("ecommerceTitle", "ecommerceDesc", "React, Node.js, MongoDB, Stripe", "ecommerce-platform"),
        ("analyticsTitle", "analyticsDesc", "Python, React, D3.js, Flask", "analytics-dashboard"),
        ("taskTitle", "taskDesc", "React, Node.js, Socket.io, PostgreSQL", "task-manager"),
        ("weatherTitle", "weatherDesc", "JavaScript, HTML, CSS, Weather API", "weather-app"),
        ("mlTitle", "mlDesc", "Python, Scikit-learn, Flask, Pandas", "ml-model"),
        ("socialTitle", "socialDesc", "React, Node.js, MongoDB, Socket.io", "social-clone"),
    ];

    let mut lines = vec![heading(app.t("projectsTitle"), palette), Line::from(app.t("projectsSubtitle")), Line::from("")];
    for (title, desc, tech, repo) in projects {
        lines.push(Line::from(Span::styled(
            app.t(title),
            Style::default().fg(palette.light).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("  {}", app.t(desc))));
        lines.push(Line::from(Span::styled(format!("  {}", tech), Style::default().fg(palette.tertiary))));
        lines.push(Line::from(Span::styled(
            format!("  {}: https://github.com/username/{}", app.t("repository"), repo),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(""));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_current_project(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let sections: [(&str, &[&str]); 4] = [
        (
            "projectAim",
            &["realtimeAnalysis", "contextAwareCompletion", "bugDetection", "codeOptimization", "multiLanguageSupport"],
        ),
        ("currentDrawbacks", &["highComputationalReq", "accuracyVaries", "contextLimited", "integrationChallenges"]),
        (
            "technicalLimitations",
            &["modelSizeConstraints", "limitedTrainingData", "complexArchitecture", "performanceBottlenecks", "crossPlatformIssues"],
        ),
        ("currentIssues", &["memoryLeaks", "inconsistentSuggestions", "extensionCrashes", "slowResponseTimes"]),
    ];

    let mut lines = vec![
        heading(app.t("mysteryProjectTitle"), palette),
        Line::from(app.t("mysteryProjectSubtitle")),
        Line::from(""),
    ];
    for (title, items) in sections {
        lines.push(heading(app.t(title), palette));
        if title == "projectAim" {
            lines.push(Line::from(app.t("projectAimDescription")));
        }
        lines.extend(items.iter().map(|key| bullet(app.t(key))));
        lines.push(Line::from(""));
    }

    lines.push(heading(app.t("developmentPhase"), palette));
    lines.push(Line::from(format!("{}: {}", app.t("phaseText"), app.t("phaseDescription"))));
    let milestones = [
        ("phaseResearchPlanning", "✓"),
        ("phaseCoreDevlopment", "✓"),
        ("phaseBetaTesting", "↻"),
        ("phaseProductionRelease", " "),
        ("phaseFeatureEnhancement", " "),
    ];
    for (key, mark) in milestones {
        let style = match mark {
            "✓" => Style::default().fg(palette.secondary),
            "↻" => Style::default().fg(palette.light).add_modifier(Modifier::BOLD),
            _ => Style::default().fg(Color::Gray),
        };
        lines.push(Line::from(Span::styled(format!("  [{}] {}", mark, app.t(key)), style)));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn field_line<'a>(label: String, value: &str, selected: bool, editing: bool, palette: &Palette) -> Line<'a> {
    let cursor = if editing { "▏" } else { "" };
    let style = if selected {
        Style::default().fg(palette.light).add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("{:>14}: ", label), Style::default().fg(palette.secondary)),
        Span::styled(format!("{}{}", value, cursor), style),
    ])
}

fn render_contact(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let mut lines = vec![
        heading(app.t("contactTitle"), palette),
        Line::from(app.t("contactSubtitle")),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{}: ", app.t("emailMe")), Style::default().fg(palette.light)),
            Span::raw(app.t("emailMeDesc")),
        ]),
        Line::from(""),
    ];

    if app.contact_submission.is_sent() {
        lines.push(Line::from(Span::styled(
            format!("✓ {}", app.t("messageSentSuccess")),
            Style::default().fg(palette.secondary).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    for (i, key) in CONTACT_FIELD_KEYS.iter().enumerate() {
        let editing = app.editing == Some(EditTarget::ContactField(i));
        lines.push(field_line(app.t(key), &app.contact.fields[i], app.contact.cursor == i, editing, palette));
    }
    lines.push(Line::from(""));

    let button = if app.contact_submission.is_sending() { app.t("sending") } else { app.t("sendMessage") };
    let button_style = if app.contact.cursor == CONTACT_FIELD_KEYS.len() {
        Style::default().fg(palette.primary).add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        Style::default().fg(palette.primary)
    };
    lines.push(Line::from(Span::styled(format!("[ {} ]", button), button_style)));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_settings(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let snapshot = app.snapshot();
    let selected = app.selected_settings_entry();
    let language = app.translator.language();

    let mut lines = vec![
        heading(app.t("settingsTitle"), palette),
        Line::from(app.t("settingsSubtitle")),
        Line::from(""),
    ];

    let mut section = None;
    for entry in settings_entries() {
        let title = match entry {
            SettingsEntry::Theme(_) => "themeSettings",
            SettingsEntry::Language(_) => "languageSettings",
            SettingsEntry::BugDetails | SettingsEntry::SubmitBug => "bugReport",
        };
        if section != Some(title) {
            if section.is_some() {
                lines.push(Line::from(""));
            }
            lines.push(heading(app.t(title), palette));
            if title == "bugReport" {
                lines.push(Line::from(app.t("bugReportDesc")));
                if app.bug_submission.is_sent() {
                    let stamp = app.bug.timestamp.clone().unwrap_or_default();
                    lines.push(Line::from(Span::styled(
                        format!("✓ {} ({})", app.t("bugReportSuccess"), stamp),
                        Style::default().fg(palette.secondary).add_modifier(Modifier::BOLD),
                    )));
                }
            }
            section = Some(title);
        }

        let is_selected = entry == selected;
        let highlight = |style: Style| if is_selected { style.add_modifier(Modifier::REVERSED) } else { style };

        let line = match entry {
            SettingsEntry::Theme(option) => {
                let mark = if option.is_active(&snapshot) { "●" } else { "○" };
                Line::from(vec![
                    Span::styled(format!("  {} {:<12}", mark, app.t(option.name_key())), highlight(Style::default().fg(palette.light))),
                    Span::styled(format!(" {}", app.t(option.description_key())), Style::default().fg(Color::Gray)),
                ])
            }
            SettingsEntry::Language(lang) => {
                let mark = if lang == language { "●" } else { "○" };
                Line::from(Span::styled(
                    format!("  {} [{}] {}", mark, lang.flag(), lang.name()),
                    highlight(Style::default().fg(palette.light)),
                ))
            }
            SettingsEntry::BugDetails => {
                let editing = app.editing == Some(EditTarget::BugDetails);
                field_line(app.t("bugDetails"), &app.bug.details, is_selected, editing, palette)
            }
            SettingsEntry::SubmitBug => {
                let label = if app.bug_submission.is_sending() { app.t("sending") } else { app.t("submitBugReport") };
                Line::from(Span::styled(format!("  [ {} ]", label), highlight(Style::default().fg(palette.primary))))
            }
        };
        lines.push(line);
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_help(f: &mut Frame, palette: &Palette, area: Rect) {
    let popup = centered_rect(60, 60, area);
    let text = vec![
        Line::from("Tab / →        next page"),
        Line::from("Shift-Tab / ←  previous page"),
        Line::from("1-5            jump to page"),
        Line::from("↑ / ↓          move between options or fields"),
        Line::from("Enter          choose option, edit field, send"),
        Line::from("Esc            stop editing / close help"),
        Line::from("Ctrl-V         paste into the field being edited"),
        Line::from("q              quit"),
    ];
    let help = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.primary))
            .title(" Help "),
    );
    f.render_widget(Clear, popup);
    f.render_widget(help, popup);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
