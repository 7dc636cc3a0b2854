//! The application coordinator.
//!
//! Owns the current-screen state, runs the ordered startup sequence, routes
//! domain events to the cart and to navigation, and loads themes.

use crate::application::collaborators::{AppContext, CartManager, ScreenManager, StorageManager};
use crate::application::container::Container;
use crate::application::event_bus::{EventBus, SubscriptionError};
use crate::application::state::{ApplicationState, InitStage};
use crate::application::themes::ThemeRegistry;
use crate::domain::{
    CartError, Catalog, DomainEvent, EventKind, HOME_SCREEN, ScreenData, ScreenError, ScreenId,
    StorageError, ThemeVariant,
};
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("startup failed at {stage}: {source}")]
    Init {
        stage: InitStage,
        #[source]
        source: Box<dyn std::error::Error>,
    },
    #[error("coordinator is already initialized")]
    AlreadyInitialized,
    #[error("navigation to {screen} failed: {source}")]
    Navigation {
        screen: ScreenId,
        #[source]
        source: ScreenError,
    },
    #[error("loading the {variant} theme failed: {source}")]
    Theme {
        variant: ThemeVariant,
        #[source]
        source: ScreenError,
    },
    #[error("no subscription for {0} events")]
    NotSubscribed(EventKind),
    #[error("cart update failed: {0}")]
    Cart(#[from] CartError),
}

impl AppError {
    fn init(stage: InitStage, source: impl std::error::Error + 'static) -> Self {
        AppError::Init {
            stage,
            source: Box::new(source),
        }
    }
}

/// Result type for coordinator operations.
pub type AppResult<T> = Result<T, AppError>;

/// Builds the read-only view handed to screens from disjoint coordinator
/// fields, so the screen manager can be borrowed mutably alongside it.
macro_rules! app_context {
    ($self:ident) => {
        AppContext {
            cart: &*$self.cart,
            storage: &*$self.storage,
            catalog: &$self.catalog,
            current_screen: $self.state.current_screen(),
        }
    };
}

/// Central coordinator of the register.
///
/// Owns the collaborators and the navigation state. Nothing is usable until
/// [`AppCoordinator::init`] has completed: events are rejected and no screen
/// is mounted.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use tpos::application::{AppCoordinator, Container, PersistentCart, ThemeRegistry};
/// use tpos::domain::{Catalog, DomainEvent};
/// use tpos::infrastructure::MemoryStorage;
/// use tpos::presentation::ScreenRegistry;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let container = Container::new();
/// let mut coordinator = AppCoordinator::new(
///     Rc::new(MemoryStorage::new()),
///     Box::new(PersistentCart::new()),
///     Box::new(ScreenRegistry::with_builtin_screens(container.clone())),
///     ThemeRegistry::new(),
///     container,
/// )
/// .with_catalog(Catalog::demo());
///
/// coordinator.init().await.unwrap();
/// assert_eq!(coordinator.current_screen().map(|s| s.as_str()), Some("home"));
///
/// coordinator.dispatch(DomainEvent::navigate("cart")).await.unwrap();
/// assert!(coordinator.container().contents().as_str().starts_with("Cart"));
/// # });
/// ```
pub struct AppCoordinator {
    state: ApplicationState,
    storage: Rc<dyn StorageManager>,
    cart: Box<dyn CartManager>,
    screens: Box<dyn ScreenManager>,
    themes: ThemeRegistry,
    container: Container,
    catalog: Catalog,
    bus: EventBus,
}

impl AppCoordinator {
    /// Creates an uninitialized coordinator with an empty catalog.
    ///
    /// # Arguments
    ///
    /// * `storage` - Key-value store, shared with the cart during startup
    /// * `cart` - Cart manager receiving the cart events
    /// * `screens` - Screen manager used for every navigation
    /// * `themes` - Loaders for the restaurant and express themes
    /// * `container` - Must be the same container the screen manager mounts into
    pub fn new(
        storage: Rc<dyn StorageManager>,
        cart: Box<dyn CartManager>,
        screens: Box<dyn ScreenManager>,
        themes: ThemeRegistry,
        container: Container,
    ) -> Self {
        Self {
            state: ApplicationState::default(),
            storage,
            cart,
            screens,
            themes,
            container,
            catalog: Catalog::default(),
            bus: EventBus::new(),
        }
    }

    /// Replaces the product catalog offered to screens and themes.
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Runs the startup sequence. Each step starts only after the previous
    /// one completed; the first failure aborts the rest.
    ///
    /// The steps are: storage, cart, screen manager, event subscriptions and
    /// the initial navigation to the home screen. Completed steps are not
    /// undone when a later one fails.
    ///
    /// # Errors
    ///
    /// * [`AppError::Init`] naming the [`InitStage`] that failed
    /// * [`AppError::AlreadyInitialized`] if startup already completed
    pub async fn init(&mut self) -> AppResult<()> {
        if self.state.is_initialized() {
            warn!("init called on an initialized coordinator");
            return Err(AppError::AlreadyInitialized);
        }

        match self.run_startup().await {
            Ok(()) => {
                self.state.mark_initialized();
                info!(screen = %HOME_SCREEN, "application initialized");
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "application failed to initialize");
                Err(err)
            }
        }
    }

    async fn run_startup(&mut self) -> AppResult<()> {
        debug!(stage = %InitStage::Storage, "startup");
        self.storage
            .init()
            .await
            .map_err(|e: StorageError| AppError::init(InitStage::Storage, e))?;

        debug!(stage = %InitStage::Cart, "startup");
        self.cart
            .init(Rc::clone(&self.storage))
            .await
            .map_err(|e| AppError::init(InitStage::Cart, e))?;

        debug!(stage = %InitStage::Screens, "startup");
        let app = app_context!(self);
        self.screens
            .init(&app)
            .map_err(|e| AppError::init(InitStage::Screens, e))?;

        debug!(stage = %InitStage::Subscriptions, "startup");
        self.subscribe_events()
            .map_err(|e| AppError::init(InitStage::Subscriptions, e))?;

        debug!(stage = %InitStage::InitialNavigation, "startup");
        self.navigate_to(HOME_SCREEN, ScreenData::new())
            .await
            .map_err(|e| AppError::init(InitStage::InitialNavigation, e))?;
        Ok(())
    }

    fn subscribe_events(&mut self) -> Result<(), SubscriptionError> {
        self.bus.subscribe_all(&EventKind::ALL)
    }

    /// Routes one event to its handler, in the caller's turn.
    ///
    /// `Navigate` goes to [`AppCoordinator::navigate_to`]; the four cart
    /// events each make exactly one call on the cart manager with the event's
    /// payload.
    ///
    /// # Errors
    ///
    /// * [`AppError::NotSubscribed`] before startup registered the handlers;
    ///   no collaborator is touched
    /// * [`AppError::Navigation`] when the screen cannot be mounted
    /// * [`AppError::Cart`] when the cart rejects the change
    pub async fn dispatch(&mut self, event: DomainEvent) -> AppResult<()> {
        let kind = event.kind();
        if !self.bus.record_delivery(kind) {
            warn!(event = %kind, "event dropped, no subscription");
            return Err(AppError::NotSubscribed(kind));
        }
        debug!(event = %kind, "dispatching");

        let result = match event {
            DomainEvent::Navigate { screen, data } => return self.navigate_to(screen, data).await,
            DomainEvent::AddToCart { product } => self.cart.add_item(product),
            DomainEvent::UpdateCart { item_id, quantity } => {
                self.cart.update_quantity(&item_id, quantity)
            }
            DomainEvent::RemoveFromCart { item_id } => self.cart.remove_item(&item_id),
            DomainEvent::ClearCart => self.cart.clear(),
        };

        result.map_err(|err| {
            error!(event = %kind, error = %err, "cart update failed");
            AppError::Cart(err)
        })
    }

    /// Shows `screen`. The current screen is updated before the mount and
    /// is kept even when the mount fails.
    ///
    /// # Arguments
    ///
    /// * `screen` - Registered screen id, e.g. `"cart"`
    /// * `data` - Payload handed to the screen; pass an empty map for none
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Navigation`] if the screen manager fails to show
    /// the screen.
    pub async fn navigate_to(
        &mut self,
        screen: impl Into<ScreenId>,
        data: ScreenData,
    ) -> AppResult<()> {
        let screen = screen.into();
        self.state.enter_screen(screen.clone());

        let app = app_context!(self);
        match self.screens.show_screen(&screen, &data, &app).await {
            Ok(()) => {
                info!(screen = %screen, "navigated");
                Ok(())
            }
            Err(source) => {
                error!(screen = %screen, error = %source, "navigation failed");
                Err(AppError::Navigation { screen, source })
            }
        }
    }

    /// Switches the top-level screen set. On failure the container keeps
    /// whatever it showed before.
    ///
    /// Restaurant and express resolve their screen through the theme
    /// registry, render it and only then replace the container. Evolution
    /// navigates back to the home screen. The current screen is left alone
    /// by the first two.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Theme`] when the variant has no loader or its
    /// screen fails to resolve, render or finish mounting.
    pub async fn load_theme(&mut self, variant: ThemeVariant) -> AppResult<()> {
        let result = match variant {
            ThemeVariant::Evolution => {
                match self.navigate_to(HOME_SCREEN, ScreenData::new()).await {
                    Ok(()) => Ok(()),
                    Err(AppError::Navigation { source, .. }) => Err(source),
                    Err(other) => return Err(other),
                }
            }
            ThemeVariant::Restaurant | ThemeVariant::Express => self.mount_theme(variant).await,
        };

        match result {
            Ok(()) => {
                self.state.set_active_theme(variant);
                info!(theme = %variant, "theme loaded");
                Ok(())
            }
            Err(source) => {
                error!(theme = %variant, error = %source, "theme load failed");
                Err(AppError::Theme { variant, source })
            }
        }
    }

    async fn mount_theme(&self, variant: ThemeVariant) -> Result<(), ScreenError> {
        let loader = self
            .themes
            .get(variant)
            .ok_or(ScreenError::ThemeNotRegistered(variant))?;
        let app = app_context!(self);
        let mut screen = loader.resolve(&app).await?;
        let markup = screen.render(&app).await?;
        self.container.replace(markup);
        screen.after_render(&app).await
    }

    /// Shorthand for `load_theme(ThemeVariant::Restaurant)`.
    pub async fn load_restaurant_theme(&mut self) -> AppResult<()> {
        self.load_theme(ThemeVariant::Restaurant).await
    }

    /// Shorthand for `load_theme(ThemeVariant::Express)`.
    pub async fn load_express_theme(&mut self) -> AppResult<()> {
        self.load_theme(ThemeVariant::Express).await
    }

    /// Shorthand for `load_theme(ThemeVariant::Evolution)`.
    pub async fn load_evolution_theme(&mut self) -> AppResult<()> {
        self.load_theme(ThemeVariant::Evolution).await
    }

    /// Gets the cart manager, for reading the cart.
    pub fn cart_manager(&self) -> &dyn CartManager {
        &*self.cart
    }

    pub fn storage_manager(&self) -> &dyn StorageManager {
        &*self.storage
    }

    /// Gets the screen last navigated to, whether or not it mounted.
    ///
    /// # Returns
    ///
    /// `None` until the first navigation has started
    pub fn current_screen(&self) -> Option<&ScreenId> {
        self.state.current_screen()
    }

    /// Whether every startup step has completed.
    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    /// Gets the last theme that loaded successfully.
    pub fn active_theme(&self) -> Option<ThemeVariant> {
        self.state.active_theme()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Gets the application container that screens and themes render into.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Gets the subscription table and its delivery counters.
    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }
}
