use crate::application::AppCoordinator;
use crate::domain::{
    CART_SCREEN, CHECKOUT_SCREEN, DomainEvent, HOME_SCREEN, ScreenData, ScreenId, ThemeVariant,
};
use crate::presentation::screens::QUICK_KEYS;
use crate::presentation::session::{Action, Session};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(
        coordinator: &AppCoordinator,
        session: &Session,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> Action {
        if session.show_help {
            return Action::ToggleHelp;
        }
        if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
            return Action::Quit;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::F(1) | KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Char(digit @ '1'..='9') => Self::quick_key(coordinator, digit),
            KeyCode::Char('h') => Self::navigate(HOME_SCREEN, ScreenData::new()),
            KeyCode::Char('c') => Self::navigate(CART_SCREEN, session.cart_data()),
            KeyCode::Char('k') => Self::navigate(CHECKOUT_SCREEN, ScreenData::new()),
            KeyCode::Up => Action::SelectLine(-1),
            KeyCode::Down => Action::SelectLine(1),
            KeyCode::Char('+') => Self::adjust_selected(coordinator, session, 1),
            KeyCode::Char('-') => Self::adjust_selected(coordinator, session, -1),
            KeyCode::Char('d') | KeyCode::Delete => Self::remove_selected(coordinator, session),
            KeyCode::Char('x') => Action::Dispatch(vec![DomainEvent::ClearCart]),
            KeyCode::Char('n') => Action::Dispatch(vec![
                DomainEvent::ClearCart,
                DomainEvent::navigate(HOME_SCREEN),
            ]),
            KeyCode::Char('r') => Action::LoadTheme(ThemeVariant::Restaurant),
            KeyCode::Char('e') => Action::LoadTheme(ThemeVariant::Express),
            KeyCode::Char('v') => Action::LoadTheme(ThemeVariant::Evolution),
            KeyCode::Char('p') => Action::ExportReceipt,
            _ => Action::Ignore,
        }
    }

    fn navigate(screen: &str, data: ScreenData) -> Action {
        Action::Dispatch(vec![DomainEvent::Navigate {
            screen: ScreenId::from(screen),
            data,
        }])
    }

    fn quick_key(coordinator: &AppCoordinator, digit: char) -> Action {
        let index = digit.to_digit(10).map(|d| d as usize - 1);
        match index.and_then(|i| (i < QUICK_KEYS).then_some(i)) {
            Some(i) => match coordinator.catalog().get(i) {
                Some(product) => Action::Dispatch(vec![DomainEvent::AddToCart {
                    product: product.clone(),
                }]),
                None => Action::Ignore,
            },
            None => Action::Ignore,
        }
    }

    fn adjust_selected(coordinator: &AppCoordinator, session: &Session, delta: i64) -> Action {
        let cart = coordinator.cart_manager().cart();
        let Some(item) = cart.items.get(session.selected_line) else {
            return Action::Ignore;
        };
        let quantity = u32::try_from((i64::from(item.quantity) + delta).max(0)).unwrap_or(u32::MAX);
        Action::Dispatch(vec![DomainEvent::UpdateCart {
            item_id: item.id().to_string(),
            quantity,
        }])
    }

    fn remove_selected(coordinator: &AppCoordinator, session: &Session) -> Action {
        match coordinator.cart_manager().cart().items.get(session.selected_line) {
            Some(item) => Action::Dispatch(vec![DomainEvent::RemoveFromCart {
                item_id: item.id().to_string(),
            }]),
            None => Action::Ignore,
        }
    }
}
