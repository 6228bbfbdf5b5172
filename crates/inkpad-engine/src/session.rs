// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editor session — the page state machine tying the surface, stroke renderer,
// viewport, gestures, per-page overlays and undo history together.
//
// A session starts empty (a blank transparent surface for standalone marks),
// may load an image (one page) or a PDF (many pages), and moves between pages
// in two steps so hosts can render off the UI thread:
//
//   let ticket = session.begin_navigation(3)?;
//   let rendered = session.render_for(ticket).await;
//   session.complete_navigation(ticket, rendered)?;
//
// Only the most recent navigation request can complete. While a render is in
// flight every surface mutation is rejected with `SurfaceNotReady`.

use image::RgbaImage;
use inkpad_core::config::EditorConfig;
use inkpad_core::error::{InkpadError, Result};
use inkpad_core::types::{DocumentKind, ExportKind, InkColor, Point, SessionId, Tool};
use inkpad_document::{DocumentMutator, PageRenderer, PdfInkWriter, SourceDocument};
use tracing::{debug, info, instrument, warn};

use crate::enhance::smooth_ink;
use crate::export::{ExportArtifact, export_document, flatten_png};
use crate::extract::{self, InkLayer};
use crate::gesture::{GestureEvent, GestureRecognizer, PointerSample};
use crate::input::{InputEvent, InputQueue, Key, Modifiers, Reaction};
use crate::page::PageStore;
use crate::stroke::{StrokeRenderer, StrokeStyle};
use crate::surface::RasterSurface;
use crate::undo::UndoStack;
use crate::viewport::Viewport;

/// Which kind of document the session is drawing on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    /// No document: a blank surface for standalone marks.
    Empty,
    SinglePage,
    MultiPage,
}

/// Whether the surface can be drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Rendering { page: u32, generation: u64 },
}

/// Proof of a pending navigation; only the latest ticket completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationTicket {
    pub page: u32,
    generation: u64,
}

/// One editing session over at most one document.
pub struct EditorSession<R> {
    id: SessionId,
    config: EditorConfig,
    renderer: R,
    source: Option<SourceDocument>,
    current_page: u32,
    render_scale: f32,
    surface: RasterSurface,
    /// Clean render of the current page; `None` without a document.
    background: Option<RgbaImage>,
    pages: PageStore,
    undo: UndoStack,
    viewport: Viewport,
    gestures: GestureRecognizer,
    stroke: StrokeRenderer,
    style: StrokeStyle,
    phase: Phase,
    generation: u64,
    /// Current page modified since it was shown.
    dirty: bool,
    /// `dirty` as it was before the active stroke took its undo snapshot.
    dirty_before_stroke: bool,
    /// Zoom level when the running pinch started.
    pinch_base_zoom: f32,
}

impl<R: PageRenderer> EditorSession<R> {
    // -- Construction ---------------------------------------------------------

    pub fn new(config: EditorConfig, renderer: R) -> Self {
        let blank = config.blank_surface;
        let id = SessionId::new();
        info!(session = %id, width = blank.width, height = blank.height, "editor session created");
        Self {
            id,
            renderer,
            source: None,
            current_page: 1,
            render_scale: 1.0,
            surface: RasterSurface::new(blank.width, blank.height),
            background: None,
            pages: PageStore::new(),
            undo: UndoStack::new(config.undo_limit),
            viewport: Viewport::new(config.zoom.clone(), blank.width, blank.height),
            gestures: GestureRecognizer::new(&config.gesture),
            stroke: StrokeRenderer::new(&config.stroke),
            style: StrokeStyle::from_config(&config.stroke),
            phase: Phase::Ready,
            generation: 0,
            dirty: false,
            dirty_before_stroke: false,
            pinch_base_zoom: 1.0,
            config,
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> DocumentState {
        match self.source.as_ref().map(SourceDocument::kind) {
            None => DocumentState::Empty,
            Some(DocumentKind::Image) => DocumentState::SinglePage,
            Some(DocumentKind::Paged) => DocumentState::MultiPage,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Pages in the loaded document; the blank surface counts as one.
    pub fn page_count(&self) -> u32 {
        self.source.as_ref().map_or(1, SourceDocument::page_count)
    }

    pub fn surface(&self) -> &RgbaImage {
        self.surface.pixels()
    }

    pub fn background(&self) -> Option<&RgbaImage> {
        self.background.as_ref()
    }

    pub fn render_scale(&self) -> f32 {
        self.render_scale
    }

    pub fn pages(&self) -> &PageStore {
        &self.pages
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn is_stroke_active(&self) -> bool {
        self.stroke.is_active()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Hosts adjust layout and zoom through this.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    // -- Style ----------------------------------------------------------------

    pub fn set_tool(&mut self, tool: Tool) {
        self.style.tool = tool;
    }

    /// Set the pen colour from `#rrggbb`.
    pub fn set_color(&mut self, hex: &str) -> Result<()> {
        self.style.color = InkColor::from_hex(hex)?;
        Ok(())
    }

    /// Set the base width in document units (at least one).
    pub fn set_base_width(&mut self, width: f32) {
        self.style.base_width = width.max(1.0);
    }

    // -- Documents ------------------------------------------------------------

    /// Load a new document and show its first page.
    ///
    /// Nothing changes unless the document is accepted and its first page
    /// renders.
    #[instrument(skip(self, bytes), fields(session = %self.id, bytes_len = bytes.len()))]
    pub async fn load_document(&mut self, bytes: Vec<u8>, declared_mime: Option<&str>) -> Result<()> {
        let source = SourceDocument::load(bytes, declared_mime, self.config.max_input_bytes)?;
        let scale = match source.kind() {
            DocumentKind::Image => self.config.image_render_scale,
            DocumentKind::Paged => self.config.paged_render_scale,
        };
        let background = self.renderer.render_page(&source, 1, scale).await?;

        self.stroke.end();
        self.gestures.reset();
        // Any pending navigation belongs to the old document.
        self.generation += 1;
        self.phase = Phase::Ready;
        self.pages.clear();
        self.undo.clear();
        self.render_scale = scale;
        self.current_page = 1;
        self.show_page(1, background, None);

        info!(
            kind = ?source.kind(),
            pages = source.page_count(),
            scale,
            "document loaded"
        );
        self.source = Some(source);
        Ok(())
    }

    // -- Navigation -----------------------------------------------------------

    /// Start moving to `page`. The outgoing page's overlay is captured first.
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn begin_navigation(&mut self, page: u32) -> Result<NavigationTicket> {
        let count = match &self.source {
            None => return Err(InkpadError::NoDocument),
            Some(SourceDocument::Image(_)) => return Err(InkpadError::NotPaged),
            Some(SourceDocument::Paged(paged)) => paged.page_count(),
        };
        if page == 0 || page > count {
            return Err(InkpadError::PageOutOfRange { page, count });
        }

        if self.phase == Phase::Ready {
            self.end_stroke();
            self.capture_if_modified();
        }
        self.generation += 1;
        self.phase = Phase::Rendering {
            page,
            generation: self.generation,
        };
        debug!(page, generation = self.generation, "navigation started");
        Ok(NavigationTicket {
            page,
            generation: self.generation,
        })
    }

    /// Render the page a ticket asks for, without touching session state.
    pub async fn render_for(&self, ticket: NavigationTicket) -> Result<RgbaImage> {
        let source = self.source.as_ref().ok_or(InkpadError::NoDocument)?;
        self.renderer
            .render_page(source, ticket.page, self.render_scale)
            .await
    }

    /// Finish a navigation with the render result.
    ///
    /// Stale tickets fail with `Superseded` and change nothing. A failed render
    /// leaves the previous page showing.
    #[instrument(skip(self, rendered), fields(session = %self.id, page = ticket.page))]
    pub fn complete_navigation(
        &mut self,
        ticket: NavigationTicket,
        rendered: Result<RgbaImage>,
    ) -> Result<()> {
        match self.phase {
            Phase::Rendering { generation, .. } if generation == ticket.generation => {}
            _ => {
                debug!(generation = ticket.generation, "stale render discarded");
                return Err(InkpadError::Superseded { page: ticket.page });
            }
        }
        self.phase = Phase::Ready;

        let background = match rendered {
            Ok(background) => background,
            Err(err) => {
                warn!(error = %err, current = self.current_page, "page render failed");
                return Err(match err {
                    InkpadError::RenderFailed { .. } => err,
                    other => InkpadError::RenderFailed {
                        page: ticket.page,
                        reason: other.to_string(),
                    },
                });
            }
        };

        let overlay = match self.pages.overlay(ticket.page) {
            Some(overlay) if overlay.dimensions() == background.dimensions() => Some(overlay.clone()),
            Some(_) => {
                warn!("stored overlay does not match the page size, dropping it");
                self.pages.discard_overlay(ticket.page);
                None
            }
            None => None,
        };
        self.undo.clear();
        self.current_page = ticket.page;
        self.show_page(ticket.page, background, overlay);
        info!("page shown");
        Ok(())
    }

    /// Navigate to `page` and wait for it to render.
    pub async fn go_to_page(&mut self, page: u32) -> Result<()> {
        let ticket = self.begin_navigation(page)?;
        let rendered = self.render_for(ticket).await;
        self.complete_navigation(ticket, rendered)
    }

    pub async fn next_page(&mut self) -> Result<()> {
        self.go_to_page(self.current_page.saturating_add(1)).await
    }

    pub async fn previous_page(&mut self) -> Result<()> {
        self.go_to_page(self.current_page.saturating_sub(1)).await
    }

    // -- Surface mutation -----------------------------------------------------

    /// Restore the clean page (or a blank surface) and forget its overlay.
    #[instrument(skip(self), fields(session = %self.id, page = self.current_page))]
    pub fn clear_current_page(&mut self) -> Result<()> {
        self.ensure_ready()?;
        self.stroke.end();
        match &self.background {
            Some(background) => self.surface.restore(background.clone()),
            None => self.surface.clear(),
        }
        if self.source.is_some() {
            self.pages.discard_overlay(self.current_page);
        }
        self.undo.clear();
        self.dirty = false;
        info!("page cleared");
        Ok(())
    }

    /// Undo the last mutation. With nothing to undo the clean background is
    /// restored. Returns whether the surface changed.
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn undo(&mut self) -> Result<bool> {
        self.ensure_ready()?;
        self.stroke.end();
        let changed = match (self.undo.pop(), &self.background) {
            (Some(snapshot), _) => {
                self.surface.restore(snapshot);
                true
            }
            (None, Some(background)) => {
                let changed = self.surface.pixels() != background;
                self.surface.restore(background.clone());
                changed
            }
            (None, None) => false,
        };
        if changed {
            self.dirty = true;
            self.capture_current();
        }
        debug!(changed, remaining = self.undo.len(), "undo");
        Ok(changed)
    }

    /// Start a stroke at `point` (surface pixels) and draw a dot there.
    pub fn begin_stroke(&mut self, point: Point, time_ms: f64) -> Result<()> {
        self.ensure_ready()?;
        if self.stroke.is_armed() {
            // The armed stroke already took the undo snapshot.
            self.stroke.end();
        } else {
            self.end_stroke();
            self.dirty_before_stroke = self.dirty;
            self.undo.push(self.surface.snapshot());
        }
        self.stroke
            .begin(&mut self.surface, point, time_ms, &self.style, self.render_scale);
        self.dirty = true;
        Ok(())
    }

    /// Start a stroke that only draws from its second sample on.
    pub fn arm_stroke(&mut self) -> Result<()> {
        self.ensure_ready()?;
        if !self.stroke.is_active() {
            self.dirty_before_stroke = self.dirty;
            self.undo.push(self.surface.snapshot());
            self.stroke.arm(&self.style, self.render_scale);
        }
        Ok(())
    }

    /// Continue the active stroke. Returns whether pixels were drawn.
    pub fn extend_stroke(&mut self, point: Point, time_ms: f64) -> Result<bool> {
        self.ensure_ready()?;
        let drawn = self.stroke.extend(&mut self.surface, point, time_ms).is_some();
        self.dirty |= drawn;
        Ok(drawn)
    }

    /// Finish the active stroke and capture the page overlay. Returns whether a
    /// stroke was active.
    pub fn end_stroke(&mut self) -> bool {
        let was_active = self.stroke.end();
        if was_active {
            self.capture_current();
        }
        was_active
    }

    /// Abandon the active stroke, restoring the pixels from before it began.
    /// The page overlay is left as it was. Returns whether a stroke was active.
    pub fn cancel_stroke(&mut self) -> bool {
        if !self.stroke.end() {
            return false;
        }
        if let Some(snapshot) = self.undo.pop() {
            self.surface.restore(snapshot);
        }
        self.dirty = self.dirty_before_stroke;
        debug!(session = %self.id, "stroke cancelled");
        true
    }

    /// Soften the ink with a box blur. Returns the number of pixels changed.
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn enhance_ink(&mut self) -> Result<usize> {
        self.ensure_ready()?;
        self.end_stroke();
        self.undo.push(self.surface.snapshot());
        let changed = smooth_ink(
            self.surface.pixels_mut(),
            self.background.as_ref(),
            self.config.diff_tolerance,
        );
        self.dirty = true;
        self.capture_current();
        Ok(changed)
    }

    // -- Extraction and export ------------------------------------------------

    /// Separate the ink of `page` from a fresh render of its background.
    /// Returns `None` when the page was never drawn on.
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn extract_ink(&self, page: u32) -> Result<Option<InkLayer>> {
        let source = self.source.as_ref().ok_or(InkpadError::NoDocument)?;
        let count = source.page_count();
        if page == 0 || page > count {
            return Err(InkpadError::PageOutOfRange { page, count });
        }
        let Some(overlay) = self.pages.overlay(page) else {
            return Ok(None);
        };
        let clean = self
            .renderer
            .render_page(source, page, self.render_scale)
            .await?;
        extract::extract_ink(page, overlay, &clean, self.config.diff_tolerance).map(Some)
    }

    /// Export with the bundled PDF writer.
    pub async fn export(&mut self) -> Result<ExportArtifact> {
        self.export_with::<PdfInkWriter>().await
    }

    /// Export, embedding ink into paged documents with `M`.
    ///
    /// Paged documents get every inked page's layer embedded. Image documents
    /// are flattened with their ink; without a document the bare mark is
    /// exported.
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn export_with<M: DocumentMutator>(&mut self) -> Result<ExportArtifact> {
        self.ensure_ready()?;
        self.end_stroke();

        match self.source.as_ref().map(SourceDocument::kind) {
            None => flatten_png(ExportKind::StandaloneMark, self.surface.pixels()),
            Some(DocumentKind::Image) => flatten_png(ExportKind::SignedDocumentPng, self.surface.pixels()),
            Some(DocumentKind::Paged) => {
                self.capture_if_modified();
                let mut layers = Vec::new();
                for page in self.pages.inked_pages() {
                    let layer = self
                        .extract_ink(page)
                        .await
                        .map_err(|err| InkpadError::ExportFailed(err.to_string()))?;
                    layers.extend(layer);
                }
                match &self.source {
                    Some(SourceDocument::Paged(paged)) => export_document::<M>(paged.bytes(), &layers),
                    _ => Err(InkpadError::NoDocument),
                }
            }
        }
    }

    // -- Input ----------------------------------------------------------------

    /// Handle one input event.
    pub fn dispatch(&mut self, event: InputEvent) -> Reaction {
        match event {
            InputEvent::PointerDown {
                id,
                x,
                y,
                time_ms,
                button,
            } => {
                let events = self
                    .gestures
                    .pointer_down(PointerSample::new(id, x, y, time_ms), button);
                self.apply_gestures(events)
            }
            InputEvent::PointerMove { id, x, y, time_ms } => {
                let zoomed_in = self.viewport.is_zoomed_in();
                let events = self
                    .gestures
                    .pointer_move(PointerSample::new(id, x, y, time_ms), zoomed_in);
                // A hovering pointer draws an armed stroke.
                if events.is_empty() && self.gestures.is_idle() && self.stroke.is_active() {
                    let point = self.viewport.to_surface(Point::new(x, y));
                    let drawn = self.extend_stroke(point, time_ms);
                    return self.draw_reaction(drawn);
                }
                self.apply_gestures(events)
            }
            InputEvent::PointerUp { id } => {
                let events = self.gestures.pointer_up(id);
                self.apply_gestures(events)
            }
            InputEvent::PointerCancel { id } => {
                let events = self.gestures.pointer_cancel(id);
                self.apply_gestures(events)
            }
            InputEvent::Wheel {
                x,
                y,
                delta_y,
                modifiers,
                ..
            } => {
                if !modifiers.command() || delta_y == 0.0 {
                    return Reaction::Ignored;
                }
                let anchor = Point::new(x, y);
                if delta_y < 0.0 {
                    self.viewport.zoom_in_at(anchor);
                } else {
                    self.viewport.zoom_out_at(anchor);
                }
                Reaction::ViewChanged
            }
            InputEvent::Key {
                key,
                pressed,
                modifiers,
            } => self.handle_key(key, pressed, modifiers),
        }
    }

    /// Drain `queue`, returning one reaction per event.
    pub fn process_queue(&mut self, queue: &mut InputQueue) -> Vec<Reaction> {
        let mut reactions = Vec::with_capacity(queue.len());
        while let Some(event) = queue.pop() {
            reactions.push(self.dispatch(event));
        }
        reactions
    }

    fn handle_key(&mut self, key: Key, pressed: bool, modifiers: Modifiers) -> Reaction {
        match (key, pressed) {
            (Key::Z, true) if modifiers.command() => match self.undo() {
                Ok(true) => Reaction::Redraw,
                Ok(false) => Reaction::Ignored,
                Err(err) => {
                    debug!(error = %err, "undo ignored");
                    Reaction::Ignored
                }
            },
            (Key::Delete | Key::Backspace, true) => {
                if self.stroke.is_active() || self.gestures.is_drawing() {
                    return Reaction::Ignored;
                }
                match self.clear_current_page() {
                    Ok(()) => Reaction::Redraw,
                    Err(err) => {
                        debug!(error = %err, "clear ignored");
                        Reaction::Ignored
                    }
                }
            }
            (Key::Escape, true) => Reaction::DismissRequested,
            (Key::Shift, true) => {
                if let Err(err) = self.arm_stroke() {
                    debug!(error = %err, "stroke not armed");
                }
                Reaction::Ignored
            }
            (Key::Shift, false) => {
                if self.end_stroke() {
                    Reaction::Redraw
                } else {
                    Reaction::Ignored
                }
            }
            _ => Reaction::Ignored,
        }
    }

    fn apply_gestures(&mut self, events: Vec<GestureEvent>) -> Reaction {
        events
            .into_iter()
            .map(|event| self.apply_gesture(event))
            .fold(Reaction::Ignored, strongest)
    }

    fn apply_gesture(&mut self, event: GestureEvent) -> Reaction {
        match event {
            GestureEvent::StartDraw { point, time_ms } => {
                let point = self.viewport.to_surface(point);
                let begun = self.begin_stroke(point, time_ms).map(|()| true);
                self.draw_reaction(begun)
            }
            GestureEvent::ContinueDraw { point, time_ms } => {
                let point = self.viewport.to_surface(point);
                let drawn = self.extend_stroke(point, time_ms);
                self.draw_reaction(drawn)
            }
            GestureEvent::EndDraw => {
                if self.end_stroke() {
                    Reaction::Redraw
                } else {
                    Reaction::Ignored
                }
            }
            GestureEvent::CancelDraw => {
                if self.cancel_stroke() {
                    Reaction::Redraw
                } else {
                    Reaction::Ignored
                }
            }
            GestureEvent::StartPinch { .. } => {
                self.pinch_base_zoom = self.viewport.zoom();
                Reaction::Ignored
            }
            GestureEvent::ContinuePinchZoom { scale, anchor } => {
                self.viewport.set_zoom_at(self.pinch_base_zoom * scale, anchor);
                Reaction::ViewChanged
            }
            GestureEvent::ContinuePinchPan { dx, dy } | GestureEvent::ContinuePan { dx, dy } => {
                self.viewport.pan(dx, dy);
                Reaction::ViewChanged
            }
            GestureEvent::StartPan { .. } | GestureEvent::EndPan => Reaction::Ignored,
        }
    }

    fn draw_reaction(&self, result: Result<bool>) -> Reaction {
        match result {
            Ok(true) => Reaction::Redraw,
            Ok(false) => Reaction::Ignored,
            Err(err) => {
                debug!(session = %self.id, error = %err, "drawing rejected");
                Reaction::Ignored
            }
        }
    }

    // -- Internals ------------------------------------------------------------

    fn ensure_ready(&self) -> Result<()> {
        match self.phase {
            Phase::Ready => Ok(()),
            Phase::Rendering { .. } => Err(InkpadError::SurfaceNotReady),
        }
    }

    /// Show a freshly rendered page, with its overlay when one is stored.
    fn show_page(&mut self, page: u32, background: RgbaImage, overlay: Option<RgbaImage>) {
        let (width, height) = background.dimensions();
        self.surface
            .restore(overlay.unwrap_or_else(|| background.clone()));
        self.background = Some(background);
        self.pages.visit(page, width, height);
        self.viewport.set_surface_size(width, height);
        self.viewport.reset();
        self.dirty = false;
    }

    /// Store the surface as the current page's overlay.
    fn capture_current(&mut self) {
        if self.source.is_some() {
            self.pages
                .set_overlay(self.current_page, self.surface.snapshot());
        }
    }

    /// Capture the current page if it changed or already carries ink.
    fn capture_if_modified(&mut self) {
        if self.dirty || self.pages.has_overlay(self.current_page) {
            self.capture_current();
        }
    }
}

/// The reaction that asks the host for more work.
fn strongest(a: Reaction, b: Reaction) -> Reaction {
    fn rank(reaction: Reaction) -> u8 {
        match reaction {
            Reaction::Ignored => 0,
            Reaction::ViewChanged => 1,
            Reaction::Redraw => 2,
            Reaction::DismissRequested => 3,
        }
    }
    if rank(b) > rank(a) { b } else { a }
}
