/// Custom title bar shown above both pages: app name, image count and the
/// always-on-top toggle
use super::Message;
use iced::{
    widget::{Button, Container, Row, Space, Text},
    Alignment, Element, Length,
};

pub fn view<'a>(image_count: usize, always_on_top: bool) -> Element<'a, Message> {
    let pin_label = if always_on_top { "📌 Unpin" } else { "📌 Pin on top" };

    let count = match image_count {
        0 => "No folder loaded".to_string(),
        1 => "1 image".to_string(),
        n => format!("{} images", n),
    };

    Container::new(
        Row::new()
            .spacing(10)
            .align_items(Alignment::Center)
            .push(
                Button::new(Text::new(pin_label))
                    .on_press(Message::ToggleAlwaysOnTop)
                    .padding(6),
            )
            .push(Space::new(Length::Fill, Length::Shrink))
            .push(Text::new(count).size(14))
            .push(Text::new(super::WINDOW_TITLE).size(16)),
    )
    .width(Length::Fill)
    .padding(8)
    .into()
}
