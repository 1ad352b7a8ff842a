use gpui::*;
use gpui_component::input::{InputEvent, InputState};

use crate::app::QueryBuilderApp;
use crate::segment::Segment;

/// Name and value inputs bound to one segment of the session
pub struct SegmentRow {
    pub name_input: Entity<InputState>,
    pub value_input: Entity<InputState>,
    // Dropped together with the row
    _subscriptions: Vec<Subscription>,
}

impl SegmentRow {
    pub fn new(
        segment: &Segment,
        window: &mut Window,
        cx: &mut Context<QueryBuilderApp>,
    ) -> Self {
        let id = segment.id();

        let name_input = cx.new(|cx| {
            let mut input = InputState::new(window, cx).placeholder("name");
            input.set_value(segment.name().to_string(), window, cx);
            input
        });
        let value_input = cx.new(|cx| {
            let mut input = InputState::new(window, cx).placeholder("value");
            input.set_value(segment.value().to_string(), window, cx);
            input
        });

        let name_sub = cx.subscribe_in(
            &name_input,
            window,
            move |this, input, event: &InputEvent, window, cx| match event {
                InputEvent::Change => {
                    let name = input.read(cx).value().to_string();
                    this.on_segment_name_changed(id, name, window, cx);
                }
                InputEvent::PressEnter { .. } => this.on_segment_enter(id, window, cx),
                InputEvent::Focus => this.on_segment_name_focus(id, window, cx),
                InputEvent::Blur => this.on_segment_name_blur(id, window, cx),
                _ => {}
            },
        );

        let value_sub = cx.subscribe_in(
            &value_input,
            window,
            move |this, input, event: &InputEvent, window, cx| match event {
                InputEvent::Change => {
                    let value = input.read(cx).value().to_string();
                    this.on_segment_value_changed(id, value, window, cx);
                }
                InputEvent::PressEnter { .. } => this.on_segment_enter(id, window, cx),
                _ => {}
            },
        );

        Self {
            name_input,
            value_input,
            _subscriptions: vec![name_sub, value_sub],
        }
    }

    pub fn focus_name(&self, window: &mut Window, cx: &App) {
        self.name_input.read(cx).focus_handle(cx).focus(window);
    }
}
