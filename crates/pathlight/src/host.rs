//! The diagram host: render lifecycle around a [`Highlighter`].
//!
//! A [`Diagram`] is given one or more [`DiagramSource`]s and renders the
//! first one whose pathway data and SVG both load. Failed sources are
//! reported as events and skipped:
//!
//! | Topic | When |
//! |-------|------|
//! | `error.pvjson` | a source's pathway JSON does not deserialize |
//! | `error.renderer` | a source's SVG does not parse |
//! | `error.sourceData` | every source failed |
//! | `rendered` | a source was rendered and the highlighter attached |
//! | `destroy.pvjs` | [`Diagram::destroy`] is running (delivered immediately) |
//!
//! All but `destroy.pvjs` are queued until [`Diagram::flush_events`].

use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, info, warn};

use pathlight_core::{
    document::SvgDocument,
    semantic::{Pvjson, SourceData},
    style::StyleSet,
};

use crate::{
    PathlightError,
    config::AppConfig,
    events::{Event, EventBus, ListenerId},
    highlighter::Highlighter,
    search::SearchEntry,
};

/// Renderer engine assumed when a source does not name one.
pub const DEFAULT_RENDERER_ENGINE: &str = "svg";

const NO_MORE_SOURCES: &str = "No more renderable sources";

static NEXT_INSTANCE_ID: AtomicUsize = AtomicUsize::new(1);

/// One candidate rendering: the pathway data and the SVG drawn from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSource {
    svg: String,
    pvjson: String,
    renderer_engine: String,
}

impl DiagramSource {
    pub fn new(svg: impl Into<String>, pvjson: impl Into<String>) -> Self {
        Self {
            svg: svg.into(),
            pvjson: pvjson.into(),
            renderer_engine: DEFAULT_RENDERER_ENGINE.to_string(),
        }
    }

    pub fn with_renderer_engine(mut self, renderer_engine: impl Into<String>) -> Self {
        self.renderer_engine = renderer_engine.into();
        self
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn pvjson(&self) -> &str {
        &self.pvjson
    }

    pub fn renderer_engine(&self) -> &str {
        &self.renderer_engine
    }

    /// Deserializes the pathway data, then parses the SVG.
    ///
    /// # Errors
    ///
    /// Returns [`PathlightError::SourceData`] for invalid JSON and
    /// [`PathlightError::Document`] for invalid SVG.
    pub fn load(&self) -> Result<(SourceData, SvgDocument), PathlightError> {
        let pvjson: Pvjson = serde_json::from_str(&self.pvjson)
            .map_err(|err| PathlightError::new_source_data_error(err, self.pvjson.as_str()))?;
        let surface = SvgDocument::parse(&self.svg)?;
        Ok((
            SourceData::new(pvjson, self.renderer_engine.as_str()),
            surface,
        ))
    }
}

#[derive(Debug)]
struct Rendered {
    surface: SvgDocument,
    source_data: SourceData,
    highlighter: Highlighter,
    source_index: usize,
}

/// A pathway diagram with a render/destroy lifecycle.
#[derive(Debug)]
pub struct Diagram {
    sources: Vec<DiagramSource>,
    config: AppConfig,
    events: EventBus,
    state: Option<Rendered>,
    failures: Vec<PathlightError>,
    instance_id: usize,
}

impl Diagram {
    pub fn new(sources: Vec<DiagramSource>, config: AppConfig) -> Self {
        Self {
            sources,
            config,
            events: EventBus::new(),
            state: None,
            failures: Vec::new(),
            instance_id: NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Process-wide unique id of this diagram.
    pub fn instance_id(&self) -> usize {
        self.instance_id
    }

    pub fn sources(&self) -> &[DiagramSource] {
        &self.sources
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Registers an event listener, see [`EventBus::on`].
    pub fn on(&mut self, topic: &str, callback: impl FnMut(&Event) + 'static) -> ListenerId {
        self.events.on(topic, callback)
    }

    /// Removes event listeners, see [`EventBus::off`].
    pub fn off(&mut self, topic: &str) -> usize {
        self.events.off(topic)
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Delivers queued events. Returns how many were delivered.
    pub fn flush_events(&mut self) -> usize {
        self.events.flush_events()
    }

    /// Renders the first source that loads and attaches a fresh highlighter.
    ///
    /// Any previous rendering is dropped first. Why each skipped source
    /// failed is kept until the next render, see [`failures`](Self::failures).
    ///
    /// # Errors
    ///
    /// Returns [`PathlightError::NoRenderableSource`] when no source loads.
    pub fn render(&mut self) -> Result<(), PathlightError> {
        self.state = None;
        self.failures.clear();

        for (source_index, source) in self.sources.iter().enumerate() {
            let (source_data, surface) = match source.load() {
                Ok(loaded) => loaded,
                Err(err) => {
                    let topic = match err {
                        PathlightError::SourceData { .. } => "error.pvjson",
                        _ => "error.renderer",
                    };
                    warn!(source_index, err:%; "Skipping source");
                    self.events.trigger(topic, Some(&err.to_string()));
                    self.failures.push(err);
                    continue;
                }
            };

            let highlighter = Highlighter::new(&source_data, self.config.highlight().clone());
            self.state = Some(Rendered {
                surface,
                source_data,
                highlighter,
                source_index,
            });

            info!(instance_id = self.instance_id, source_index; "Diagram rendered");
            self.events.trigger("rendered", None);
            return Ok(());
        }

        self.events.trigger("error.sourceData", Some(NO_MORE_SOURCES));
        Err(PathlightError::NoRenderableSource(NO_MORE_SOURCES.to_string()))
    }

    /// Tears the diagram down: notifies `destroy.pvjs` listeners, removes
    /// every overlay, drops the rendering and forgets all listeners.
    pub fn destroy(&mut self) {
        self.events.trigger_now("destroy.pvjs", None);
        if let Some(mut state) = self.state.take() {
            state.highlighter.clear(&mut state.surface);
        }
        self.events.clear();
        debug!(instance_id = self.instance_id; "Diagram destroyed");
    }

    pub fn is_rendered(&self) -> bool {
        self.state.is_some()
    }

    /// Errors of the sources skipped by the last [`render`](Self::render).
    pub fn failures(&self) -> &[PathlightError] {
        &self.failures
    }

    /// Takes the errors of the sources skipped by the last render.
    pub fn take_failures(&mut self) -> Vec<PathlightError> {
        std::mem::take(&mut self.failures)
    }

    /// Index of the rendered source.
    pub fn rendered_source(&self) -> Option<usize> {
        self.state.as_ref().map(|state| state.source_index)
    }

    pub fn source_data(&self) -> Option<&SourceData> {
        self.state.as_ref().map(|state| &state.source_data)
    }

    pub fn surface(&self) -> Option<&SvgDocument> {
        self.state.as_ref().map(|state| &state.surface)
    }

    pub fn highlighter(&self) -> Option<&Highlighter> {
        self.state.as_ref().map(|state| &state.highlighter)
    }

    /// See [`Highlighter::highlight`]. Returns `false` before rendering.
    pub fn highlight(&mut self, selector: &str, group: Option<&str>, styles: Option<&StyleSet>) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        state
            .highlighter
            .highlight(&mut state.surface, selector, group, styles)
    }

    /// See [`Highlighter::attenuate`].
    pub fn attenuate(&mut self, selector: Option<&str>, group: Option<&str>) {
        if let Some(state) = self.state.as_mut() {
            state
                .highlighter
                .attenuate(&mut state.surface, selector, group);
        }
    }

    /// See [`Highlighter::suggest`].
    pub fn suggest(&self, query: &str) -> Vec<&SearchEntry> {
        self.highlighter()
            .map(|highlighter| highlighter.suggest(query))
            .unwrap_or_default()
    }

    /// The rendered SVG, overlays included.
    pub fn to_svg(&self) -> Option<String> {
        self.surface().map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    const SVG: &str = r#"<svg><g id="viewport"><rect id="eb5" width="10" height="10"/></g></svg>"#;
    const PVJSON: &str = r#"{"elements": [{"id": "eb5", "gpml:element": "gpml:DataNode", "textContent": "GCN-2"}]}"#;

    fn recorder(diagram: &mut Diagram, topic: &str) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        diagram.on(topic, move |event| sink.borrow_mut().push(event.to_string()));
        log
    }

    #[test]
    fn test_render_first_good_source() {
        let mut diagram = Diagram::new(
            vec![
                DiagramSource::new(SVG, "{not json"),
                DiagramSource::new("<svg><g></svg>", PVJSON),
                DiagramSource::new(SVG, PVJSON),
            ],
            AppConfig::default(),
        );
        let log = recorder(&mut diagram, "error");
        let rendered = recorder(&mut diagram, "rendered");

        diagram.render().unwrap();
        assert_eq!(diagram.rendered_source(), Some(2));
        assert_eq!(diagram.failures().len(), 2);
        assert!(log.borrow().is_empty());

        assert_eq!(diagram.flush_events(), 3);
        assert_eq!(*log.borrow(), vec!["error.pvjson", "error.renderer"]);
        assert_eq!(*rendered.borrow(), vec!["rendered"]);
    }

    #[test]
    fn test_render_without_good_source() {
        let mut diagram = Diagram::new(vec![DiagramSource::new(SVG, "42")], AppConfig::default());
        let log = recorder(&mut diagram, "error.sourceData");

        let err = diagram.render().unwrap_err();
        assert!(matches!(err, PathlightError::NoRenderableSource(_)), "{err}");
        assert!(!diagram.is_rendered());

        diagram.flush_events();
        assert_eq!(*log.borrow(), vec!["error.sourceData"]);
    }

    #[test]
    fn test_delegates_before_render() {
        let mut diagram = Diagram::new(vec![DiagramSource::new(SVG, PVJSON)], AppConfig::default());
        assert!(!diagram.highlight("GCN-2", None, None));
        diagram.attenuate(None, None);
        assert!(diagram.suggest("g").is_empty());
        assert!(diagram.to_svg().is_none());
    }

    #[test]
    fn test_destroy_removes_overlays_and_listeners() {
        let mut diagram = Diagram::new(vec![DiagramSource::new(SVG, PVJSON)], AppConfig::default());
        let log = recorder(&mut diagram, "destroy");
        diagram.render().unwrap();
        assert!(diagram.highlight("GCN-2", None, None));

        diagram.destroy();
        assert_eq!(*log.borrow(), vec!["destroy.pvjs"]);
        assert!(!diagram.is_rendered());
        assert!(!diagram.events_mut().has_listeners("rendered"));
        assert!(!diagram.events_mut().has_listeners("destroy"));
    }

    #[test]
    fn test_instance_ids_are_unique() {
        let a = Diagram::new(Vec::new(), AppConfig::default());
        let b = Diagram::new(Vec::new(), AppConfig::default());
        assert_ne!(a.instance_id(), b.instance_id());
    }

    #[test]
    fn test_source_renderer_engine() {
        let source = DiagramSource::new(SVG, PVJSON);
        assert_eq!(source.renderer_engine(), "svg");
        let (source_data, _) = source.with_renderer_engine("png").load().unwrap();
        assert_eq!(source_data.renderer_engine(), "png");
    }
}
