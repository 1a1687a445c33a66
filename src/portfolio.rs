//! Paged portfolio grid with a single detail overlay.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, ScrollBehavior, ScrollToOptions, Window,
};

use crate::config::SiteConfig;
use crate::dom::{self, Attributes, ClassList, InlineStyle, ACTIVE_CLASS};
use crate::error::{Result, SiteError};
use crate::listener::EventListener;

pub const GRID_ID: &str = "portfolioItems";
pub const ITEM_SELECTOR: &str = ".portfolio-item";
pub const IMAGE_ATTRIBUTE: &str = "data-img";
pub const PAGINATION_ID: &str = "pagination";
pub const PAGE_BUTTON_CLASS: &str = "page-btn";
pub const PAGE_ATTRIBUTE: &str = "data-page";
pub const MODAL_ID: &str = "portfolioModal";
pub const MODAL_IMAGE_ID: &str = "modalImage";
pub const MODAL_CAPTION_ID: &str = "modalCaption";
pub const MODAL_CLOSE_SELECTOR: &str = ".modal-close";

/// Page bookkeeping over a fixed item count. Pages are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    item_count: usize,
    per_page: usize,
    current: Option<usize>,
}

impl Paginator {
    pub fn new(item_count: usize, per_page: usize) -> Self {
        Self {
            item_count,
            per_page: per_page.max(1),
            current: None,
        }
    }

    pub fn page_count(&self) -> usize {
        self.item_count.div_ceil(self.per_page)
    }

    /// `None` until a page has been selected, and forever when there are no
    /// items.
    pub fn current_page(&self) -> Option<usize> {
        self.current
    }

    /// Half-open index range shown on `page`.
    pub fn range(&self, page: usize) -> Result<Range<usize>> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(SiteError::PageOutOfRange {
                requested: page,
                page_count,
            });
        }
        let start = (page - 1) * self.per_page;
        Ok(start..(start + self.per_page).min(self.item_count))
    }

    /// Rejects out-of-range pages without touching the current one.
    pub fn select(&mut self, page: usize) -> Result<Range<usize>> {
        let range = self.range(page)?;
        self.current = Some(page);
        Ok(range)
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.current
            .and_then(|page| self.range(page).ok())
            .is_some_and(|range| range.contains(&index))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDetail {
    pub image: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open(ItemDetail),
}

/// Everything the controller needs to draw.
pub trait PortfolioView {
    fn render_page_buttons(&mut self, page_count: usize);
    fn set_item_visible(&self, index: usize, visible: bool);
    fn set_button_active(&self, page: usize, active: bool);
    fn scroll_to_grid(&self, offset: f64);
    fn show_modal(&self, item: &ItemDetail);
    fn hide_modal(&self);
    fn lock_scroll(&self, locked: bool);
}

pub struct PortfolioController<V> {
    view: V,
    items: Vec<ItemDetail>,
    paginator: Paginator,
    modal: ModalState,
    scroll_offset: f64,
}

impl<V: PortfolioView> PortfolioController<V> {
    /// Renders the page buttons and shows the first page, if any.
    pub fn new(mut view: V, items: Vec<ItemDetail>, per_page: usize, scroll_offset: f64) -> Self {
        let paginator = Paginator::new(items.len(), per_page);
        view.render_page_buttons(paginator.page_count());
        let mut controller = Self {
            view,
            items,
            paginator,
            modal: ModalState::Closed,
            scroll_offset,
        };
        if controller.paginator.page_count() > 0 {
            let _ = controller.show_page(1);
        } else {
            debug!("No portfolio items to paginate");
        }
        controller
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn show_page(&mut self, page: usize) -> Result<()> {
        let range = self.paginator.select(page)?;
        for index in 0..self.items.len() {
            self.view.set_item_visible(index, range.contains(&index));
        }
        for button in 1..=self.paginator.page_count() {
            self.view.set_button_active(button, button == page);
        }
        self.view.scroll_to_grid(self.scroll_offset);
        debug!("Showing portfolio page {} ({:?})", page, range);
        Ok(())
    }

    /// Opens the overlay on `index`, replacing whatever it showed before.
    pub fn open_item(&mut self, index: usize) -> Result<()> {
        let item = self
            .items
            .get(index)
            .cloned()
            .ok_or(SiteError::UnknownItem(index))?;
        debug!("Opening portfolio item {}: {}", index, item.title);
        self.view.show_modal(&item);
        self.view.lock_scroll(true);
        self.modal = ModalState::Open(item);
        Ok(())
    }

    /// Returns whether the overlay was open.
    pub fn close_modal(&mut self) -> bool {
        let was_open = matches!(self.modal, ModalState::Open(_));
        self.view.hide_modal();
        self.view.lock_scroll(false);
        self.modal = ModalState::Closed;
        was_open
    }

    /// Clicks inside the content area do nothing.
    pub fn on_backdrop_click(&mut self, on_backdrop: bool) -> bool {
        on_backdrop && self.close_modal()
    }
}

struct ModalElements {
    container: Element,
    image: HtmlImageElement,
    caption: Element,
}

pub struct BrowserPortfolio {
    window: Window,
    document: Document,
    body: Option<Element>,
    grid: HtmlElement,
    items: Vec<Element>,
    pagination: Option<Element>,
    buttons: Vec<Element>,
    modal: Option<ModalElements>,
}

impl BrowserPortfolio {
    pub fn item_index(&self, item: &Element) -> Option<usize> {
        self.items.iter().position(|candidate| candidate == item)
    }
}

impl PortfolioView for BrowserPortfolio {
    fn render_page_buttons(&mut self, page_count: usize) {
        let Some(pagination) = &self.pagination else {
            return;
        };
        pagination.set_inner_html("");
        self.buttons.clear();
        for page in 1..=page_count {
            let Ok(button) = self.document.create_element("button") else {
                continue;
            };
            let label = page.to_string();
            button.set_text_content(Some(&label));
            button.add_class(PAGE_BUTTON_CLASS);
            button.set_attribute_value(PAGE_ATTRIBUTE, &label);
            if pagination.append_child(&button).is_ok() {
                self.buttons.push(button);
            }
        }
    }

    fn set_item_visible(&self, index: usize, visible: bool) {
        if let Some(item) = self.items.get(index) {
            item.set_style("display", if visible { "block" } else { "none" });
        }
    }

    fn set_button_active(&self, page: usize, active: bool) {
        if let Some(button) = page.checked_sub(1).and_then(|index| self.buttons.get(index)) {
            button.toggle_class(ACTIVE_CLASS, active);
        }
    }

    fn scroll_to_grid(&self, offset: f64) {
        let options = ScrollToOptions::new();
        options.set_top(f64::from(self.grid.offset_top()) - offset);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn show_modal(&self, item: &ItemDetail) {
        if let Some(modal) = &self.modal {
            modal.container.set_style("display", "block");
            modal.image.set_src(&item.image);
            modal.caption.set_text_content(Some(&item.title));
        }
    }

    fn hide_modal(&self) {
        if let Some(modal) = &self.modal {
            modal.container.set_style("display", "none");
        }
    }

    fn lock_scroll(&self, locked: bool) {
        if let Some(body) = &self.body {
            body.set_style("overflow", if locked { "hidden" } else { "auto" });
        }
    }
}

fn item_detail(item: &Element) -> ItemDetail {
    let title = item
        .query_selector("h3")
        .ok()
        .flatten()
        .and_then(|heading| heading.dyn_into::<HtmlElement>().ok())
        .map(|heading| heading.inner_text())
        .unwrap_or_default();
    ItemDetail {
        image: item.attribute(IMAGE_ATTRIBUTE).unwrap_or_default(),
        title,
    }
}

fn modal_elements(document: &Document) -> Option<ModalElements> {
    let container = document.get_element_by_id(MODAL_ID)?;
    let image = document
        .get_element_by_id(MODAL_IMAGE_ID)?
        .dyn_into::<HtmlImageElement>()
        .ok()?;
    let caption = document.get_element_by_id(MODAL_CAPTION_ID)?;
    Some(ModalElements {
        container,
        image,
        caption,
    })
}

pub type BrowserPortfolioController = PortfolioController<BrowserPortfolio>;

pub struct PortfolioHandle {
    _controller: Rc<RefCell<BrowserPortfolioController>>,
    _listeners: Vec<EventListener>,
}

pub fn mount(window: &Window, document: &Document, config: &SiteConfig) -> Result<PortfolioHandle> {
    let grid = dom::by_id(document, GRID_ID)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| SiteError::MissingElement(GRID_ID))?;
    let items = dom::select_within(&grid, ITEM_SELECTOR)?;
    let details = items.iter().map(item_detail).collect();

    let pagination = document.get_element_by_id(PAGINATION_ID);
    if pagination.is_none() {
        debug!("#{} missing, page buttons disabled", PAGINATION_ID);
    }
    let modal = modal_elements(document);
    let modal_container = modal.as_ref().map(|modal| modal.container.clone());
    let close_button = document.query_selector(MODAL_CLOSE_SELECTOR)?;

    let view = BrowserPortfolio {
        window: window.clone(),
        document: document.clone(),
        body: document.body().map(Element::from),
        grid: grid.clone(),
        items,
        pagination: pagination.clone(),
        buttons: Vec::new(),
        modal,
    };
    let controller = Rc::new(RefCell::new(PortfolioController::new(
        view,
        details,
        config.items_per_page,
        config.scroll_offset,
    )));

    let mut listeners = Vec::new();

    if let Some(pagination) = pagination {
        let controller = controller.clone();
        listeners.push(EventListener::new(&pagination, "click", move |event| {
            let page = dom::event_element(&event)
                .and_then(|target| target.closest(&format!(".{}", PAGE_BUTTON_CLASS)).ok().flatten())
                .and_then(|button| button.get_attribute(PAGE_ATTRIBUTE))
                .and_then(|page| page.parse::<usize>().ok());
            if let Some(page) = page {
                if let Err(err) = controller.borrow_mut().show_page(page) {
                    warn!("Page button ignored: {}", err);
                }
            }
        })?);
    }

    match modal_container {
        Some(container) => {
            let opener = controller.clone();
            listeners.push(EventListener::new(&grid, "click", move |event| {
                let index = dom::event_element(&event)
                    .and_then(|target| target.closest(ITEM_SELECTOR).ok().flatten())
                    .and_then(|item| opener.borrow().view().item_index(&item));
                if let Some(index) = index {
                    if let Err(err) = opener.borrow_mut().open_item(index) {
                        warn!("Portfolio item ignored: {}", err);
                    }
                }
            })?);

            if let Some(close) = close_button {
                let closer = controller.clone();
                listeners.push(EventListener::new(&close, "click", move |_| {
                    closer.borrow_mut().close_modal();
                })?);
            }

            let backdrop = controller.clone();
            let modal = container.clone();
            listeners.push(EventListener::new(&container, "click", move |event| {
                let on_backdrop = dom::event_element(&event).is_some_and(|target| target == modal);
                backdrop.borrow_mut().on_backdrop_click(on_backdrop);
            })?);
        }
        None => debug!("#{} missing, portfolio detail view disabled", MODAL_ID),
    }

    Ok(PortfolioHandle {
        _controller: controller,
        _listeners: listeners,
    })
}
