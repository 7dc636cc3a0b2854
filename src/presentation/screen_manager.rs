use crate::application::{AppContext, Container, Screen, ScreenManager};
use crate::domain::{
    CART_SCREEN, CHECKOUT_SCREEN, HOME_SCREEN, ScreenData, ScreenError, ScreenId, ScreenResult,
};
use crate::presentation::screens::{CartScreen, CheckoutScreen, HomeScreen};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Builds a screen for one mount from the navigation data.
pub type ScreenFactory = Box<dyn Fn(&ScreenData) -> Box<dyn Screen>>;

/// Screen manager resolving names through registered factories and
/// mounting into the shared container.
pub struct ScreenRegistry {
    factories: BTreeMap<ScreenId, ScreenFactory>,
    container: Container,
    mounted: Option<ScreenId>,
}

impl ScreenRegistry {
    pub fn new(container: Container) -> Self {
        Self {
            factories: BTreeMap::new(),
            container,
            mounted: None,
        }
    }

    /// Registry with the home, cart and checkout screens.
    pub fn with_builtin_screens(container: Container) -> Self {
        let mut registry = Self::new(container);
        registry.register(HOME_SCREEN, Box::new(|data| Box::new(HomeScreen::new(data))));
        registry.register(CART_SCREEN, Box::new(|data| Box::new(CartScreen::new(data))));
        registry.register(
            CHECKOUT_SCREEN,
            Box::new(|data| Box::new(CheckoutScreen::new(data))),
        );
        registry
    }

    pub fn register(&mut self, name: impl Into<ScreenId>, factory: ScreenFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn is_registered(&self, name: &ScreenId) -> bool {
        self.factories.contains_key(name)
    }

    /// Last screen that mounted successfully.
    pub fn mounted(&self) -> Option<&ScreenId> {
        self.mounted.as_ref()
    }
}

#[async_trait(?Send)]
impl ScreenManager for ScreenRegistry {
    fn init(&mut self, app: &AppContext<'_>) -> ScreenResult<()> {
        if self.factories.is_empty() {
            return Err(ScreenError::NoScreens);
        }
        info!(
            screens = self.factories.len(),
            products = app.catalog.len(),
            "screen registry ready"
        );
        Ok(())
    }

    async fn show_screen(
        &mut self,
        name: &ScreenId,
        data: &ScreenData,
        app: &AppContext<'_>,
    ) -> ScreenResult<()> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ScreenError::UnknownScreen(name.clone()))?;
        let mut screen = factory(data);
        let markup = screen.render(app).await?;
        self.container.replace(markup);
        screen.after_render(app).await?;
        self.mounted = Some(name.clone());
        debug!(screen = %name, "screen mounted");
        Ok(())
    }
}
