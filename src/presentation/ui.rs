use crate::application::AppCoordinator;
use crate::domain::format_cents;
use crate::presentation::session::Session;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render_ui(f: &mut Frame, coordinator: &AppCoordinator, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, coordinator, session, chunks[0]);
    render_container(f, coordinator, chunks[1]);
    render_status_bar(f, coordinator, session, chunks[2]);

    if session.show_help {
        render_help_popup(f);
    }
}

pub fn header_text(coordinator: &AppCoordinator, session: &Session) -> String {
    let screen = coordinator
        .current_screen()
        .map(|screen| screen.to_string())
        .unwrap_or_else(|| "-".to_string());
    let theme = coordinator
        .active_theme()
        .map(|theme| theme.to_string())
        .unwrap_or_else(|| "evolution".to_string());
    format!("{} | Screen: {} | Theme: {}", session.store_name, screen, theme)
}

fn render_header(f: &mut Frame, coordinator: &AppCoordinator, session: &Session, area: Rect) {
    let header = Paragraph::new(header_text(coordinator, session))
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_container(f: &mut Frame, coordinator: &AppCoordinator, area: Rect) {
    let title = if coordinator.is_initialized() { "Register" } else { "Register (offline)" };
    let body = Paragraph::new(coordinator.container().contents().to_string())
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(body, area);
}

pub fn status_text(coordinator: &AppCoordinator, session: &Session) -> String {
    if let Some(ref status) = session.status_message {
        return status.clone();
    }
    let cart = coordinator.cart_manager().cart();
    format!(
        "Items: {} | Subtotal: {} | 1-9: add | c: cart | k: checkout | ?: help | q: quit",
        cart.item_count(),
        format_cents(cart.subtotal_cents())
    )
}

fn render_status_bar(f: &mut Frame, coordinator: &AppCoordinator, session: &Session, area: Rect) {
    let style = if session.status_message.is_some() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let status = Paragraph::new(status_text(coordinator, session))
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);
}

fn render_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_widget = Paragraph::new(get_help_text())
        .block(Block::default()
            .borders(Borders::ALL)
            .title("tpos Keys")
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> &'static str {
    r#"=== SALE ===
1-9             Add the numbered product to the cart
+ / -           Change quantity of the selected cart line
d / Delete      Remove the selected cart line
Up / Down       Move the cart selection
x               Clear the cart
n               New sale (clear cart, back to products)

=== SCREENS ===
h               Products
c               Cart
k               Checkout
p               Print receipt (CSV in the receipt directory)

=== THEMES ===
r               Restaurant (table service)
e               Express lane
v               Evolution (default)

=== GENERAL ===
F1 or ?         Toggle this help
q / Esc         Quit"#
}
