use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{
    button::*, h_flex, input::*, v_flex, ActiveTheme as _, Disableable as _, Icon, Sizable as _,
};
use gpui_component::input::InputEvent;
use std::collections::HashMap;

use crate::config::Config;
use crate::segment::SegmentId;
use crate::segment_row::SegmentRow;
use crate::session::BuilderSession;

/// Main application view
pub struct QueryBuilderApp {
    session: BuilderSession,
    base_input: Entity<InputState>,
    rows: HashMap<SegmentId, SegmentRow>,
    segments_scroll_handle: ScrollHandle,
    _subscriptions: Vec<Subscription>,
}

impl QueryBuilderApp {
    pub fn new(config: &Config, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let session = BuilderSession::from_config(config);

        let base_input = cx.new(|cx| {
            let mut input =
                InputState::new(window, cx).placeholder("https://example.com/?a=1 or a=1&b=2");
            input.set_value(session.base().to_string(), window, cx);
            input
        });

        // Base edits recompute the result; Enter decomposes it
        let base_sub = cx.subscribe_in(
            &base_input,
            window,
            |this, input, event: &InputEvent, window, cx| match event {
                InputEvent::Change => {
                    let base = input.read(cx).value().to_string();
                    if base != this.session.base() {
                        this.session.set_base(base);
                        this.sync_from_session(window, cx);
                    }
                }
                InputEvent::PressEnter { .. } => {
                    this.session.parse_base();
                    this.sync_from_session(window, cx);
                }
                _ => {}
            },
        );

        let mut app = Self {
            session,
            base_input,
            rows: HashMap::new(),
            segments_scroll_handle: ScrollHandle::new(),
            _subscriptions: vec![base_sub],
        };
        app.sync_from_session(window, cx);
        app
    }

    /// Bring the inputs in line with the session after an operation
    fn sync_from_session(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        // Drop rows of removed segments, create rows for new ones
        let session = &self.session;
        self.rows.retain(|id, _| session.segment(*id).is_some());
        let new_segments: Vec<SegmentId> = session
            .segments()
            .map(|segment| segment.id())
            .filter(|id| !self.rows.contains_key(id))
            .collect();
        for id in new_segments {
            if let Some(segment) = self.session.segment(id) {
                let row = SegmentRow::new(segment, window, cx);
                self.rows.insert(id, row);
            }
        }

        // Parse and reset rewrite the base
        let base = self.session.base().to_string();
        if self.base_input.read(cx).value().to_string() != base {
            self.base_input.update(cx, |input, cx| {
                input.set_value(&base, window, cx);
            });
        }

        if let Some(id) = self.session.take_focus_request() {
            if let Some(row) = self.rows.get(&id) {
                row.focus_name(window, cx);
            }
        }

        window.set_window_title(self.session.page_address().as_str());
        cx.notify();
    }

    pub(crate) fn on_segment_name_changed(
        &mut self,
        id: SegmentId,
        name: String,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let unchanged = self.session.segment(id).is_some_and(|s| s.name() == name);
        if unchanged {
            return;
        }
        self.session.set_segment_name(id, name);
        self.sync_from_session(window, cx);
    }

    pub(crate) fn on_segment_value_changed(
        &mut self,
        id: SegmentId,
        value: String,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let unchanged = self.session.segment(id).is_some_and(|s| s.value() == value);
        if unchanged {
            return;
        }
        self.session.set_segment_value(id, value);
        self.sync_from_session(window, cx);
    }

    pub(crate) fn on_segment_name_focus(
        &mut self,
        id: SegmentId,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.session.focus_segment_name(id);
        self.sync_from_session(window, cx);
    }

    pub(crate) fn on_segment_name_blur(
        &mut self,
        id: SegmentId,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.session.blur_segment_name(id);
        self.sync_from_session(window, cx);
    }

    pub(crate) fn on_segment_enter(
        &mut self,
        id: SegmentId,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.session.press_enter(id);
        self.sync_from_session(window, cx);
    }

    fn delete_segment(&mut self, id: SegmentId, window: &mut Window, cx: &mut Context<Self>) {
        self.session.delete_segment(id);
        self.sync_from_session(window, cx);
    }

    fn add_segment(&mut self, _event: &ClickEvent, window: &mut Window, cx: &mut Context<Self>) {
        self.session.add_segment();
        self.sync_from_session(window, cx);
    }

    fn parse_base(&mut self, _event: &ClickEvent, window: &mut Window, cx: &mut Context<Self>) {
        self.session.parse_base();
        self.sync_from_session(window, cx);
    }

    fn reset(&mut self, _event: &ClickEvent, window: &mut Window, cx: &mut Context<Self>) {
        self.session.reset();
        self.sync_from_session(window, cx);
    }

    fn copy_result(&mut self, _event: &ClickEvent, _window: &mut Window, cx: &mut Context<Self>) {
        if let Some(text) = self.session.result().as_link_value() {
            cx.write_to_clipboard(ClipboardItem::new_string(text.to_string()));
        }
    }

    fn copy_link(&mut self, _event: &ClickEvent, _window: &mut Window, cx: &mut Context<Self>) {
        let link = self.session.page_address().as_str().to_string();
        cx.write_to_clipboard(ClipboardItem::new_string(link));
    }
}

impl Render for QueryBuilderApp {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let result_blank = self.session.result().is_blank();

        v_flex()
            .size_full()
            .gap_3()
            .p_4()
            .bg(theme.background)
            .child(
                // Header
                h_flex()
                    .items_center()
                    .gap_2()
                    .child(Icon::default().path("icons/logo.svg").size_5())
                    .child(
                        div()
                            .text_sm()
                            .font_weight(FontWeight::SEMIBOLD)
                            .text_color(theme.muted_foreground)
                            .child("QUERY BUILDER"),
                    ),
            )
            .child(
                // Base row
                h_flex()
                    .gap_2()
                    .items_center()
                    .w_full()
                    .child(
                        div()
                            .flex_1()
                            .overflow_hidden()
                            .child(Input::new(&self.base_input)),
                    )
                    .child(
                        div().flex_shrink_0().child(
                            Button::new("parse-btn")
                                .primary()
                                .label("Parse")
                                .on_click(cx.listener(Self::parse_base)),
                        ),
                    )
                    .child(
                        div().flex_shrink_0().child(
                            Button::new("reset-btn")
                                .ghost()
                                .label("Reset")
                                .on_click(cx.listener(Self::reset)),
                        ),
                    ),
            )
            .child(
                // Scrollable segments list
                v_flex()
                    .id("segments-scroll-container")
                    .gap_2()
                    .p_2()
                    .pb_4()
                    .flex_1()
                    .min_h_0()
                    .track_scroll(&self.segments_scroll_handle)
                    .overflow_scroll()
                    .children(self.session.segments().filter_map(|segment| {
                        let row = self.rows.get(&segment.id())?;
                        let id = segment.id();
                        let highlighted = segment.is_highlighted();

                        Some(
                            h_flex()
                                .gap_2()
                                .items_center()
                                .w_full()
                                .child(
                                    // Duplicate names are outlined
                                    div()
                                        .flex_1()
                                        .when(highlighted, |this| {
                                            this.border_1()
                                                .border_color(theme.warning)
                                                .rounded(theme.radius)
                                        })
                                        .child(Input::new(&row.name_input)),
                                )
                                .child(
                                    div().flex_1().child(
                                        Input::new(&row.value_input).suffix(
                                            Button::new(("delete-segment", id.as_usize()))
                                                .ghost()
                                                .xsmall()
                                                .label("×")
                                                .on_click(cx.listener(
                                                    move |this, _, window, cx| {
                                                        this.delete_segment(id, window, cx);
                                                    },
                                                )),
                                        ),
                                    ),
                                ),
                        )
                    }))
                    .child(
                        div().child(
                            Button::new("add-segment-btn")
                                .ghost()
                                .label("+ Add segment")
                                .on_click(cx.listener(Self::add_segment)),
                        ),
                    ),
            )
            .child(
                // Result
                h_flex()
                    .gap_2()
                    .items_center()
                    .w_full()
                    .p_3()
                    .rounded(theme.radius)
                    .border_1()
                    .border_color(theme.border)
                    .child(
                        div()
                            .flex_1()
                            .overflow_x_hidden()
                            .text_sm()
                            .text_color(theme.foreground)
                            .child(self.session.result().display_text().to_string()),
                    )
                    .child(
                        Button::new("copy-result-btn")
                            .xsmall()
                            .ghost()
                            .label("Copy")
                            .disabled(result_blank)
                            .on_click(cx.listener(Self::copy_result)),
                    ),
            )
            .child(
                // Page address footer
                h_flex()
                    .gap_2()
                    .items_center()
                    .w_full()
                    .child(
                        div()
                            .flex_1()
                            .text_xs()
                            .text_color(theme.muted_foreground)
                            .overflow_x_hidden()
                            .whitespace_nowrap()
                            .text_ellipsis()
                            .child(self.session.page_address().as_str().to_string()),
                    )
                    .child(
                        Button::new("copy-link-btn")
                            .xsmall()
                            .ghost()
                            .label("Copy link")
                            .on_click(cx.listener(Self::copy_link)),
                    ),
            )
    }
}
