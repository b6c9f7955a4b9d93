use iced::widget::image::Handle;
use iced::widget::{button, container, row, text, tooltip, Image, Space};
use iced::{Alignment, ContentFit, Element, Length};
use iced_aw::Wrap;

use crate::imaging::Raster;
use crate::state::data::ImageRef;
use crate::state::staging::StagingAreaSet;
use crate::Message;

/// Placeholder shown wherever there is nothing to display
pub const NO_IMAGE_TEXT: &str = "No image selected";

/// A composed raster and the image handle built from it
///
/// Keeps the handle stable while the raster is unchanged, so a cache hit in
/// a staging area does not re-upload the texture.
#[derive(Debug, Clone, Default)]
pub struct Picture {
    raster: Raster,
    handle: Option<Handle>,
}

impl Picture {
    pub fn set(&mut self, raster: Raster) {
        if raster.ptr_eq(&self.raster) {
            return;
        }
        self.handle = to_handle(&raster);
        self.raster = raster;
    }

    pub fn clear(&mut self) {
        self.set(Raster::null());
    }

    pub fn handle(&self) -> Option<&Handle> {
        self.handle.as_ref()
    }
}

/// Convert a raster to an iced image handle; the null raster has none
pub fn to_handle(raster: &Raster) -> Option<Handle> {
    if raster.is_null() {
        return None;
    }
    Some(Handle::from_rgba(
        raster.width(),
        raster.height(),
        raster.as_bytes().to_vec(),
    ))
}

/// Centered picture, or the "no image" text
pub fn picture_view<'a>(picture: &Picture) -> Element<'a, Message> {
    let content: Element<'a, Message> = match picture.handle() {
        Some(handle) => Image::new(handle.clone())
            .content_fit(ContentFit::ScaleDown)
            .into(),
        None => text(NO_IMAGE_TEXT).size(16).into(),
    };

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

/// One entry of the image list: thumbnail, name, full path as tooltip
pub fn thumbnail_row<'a>(
    image: &ImageRef,
    thumbnail: Option<&Handle>,
    selected: bool,
    size: u32,
) -> Element<'a, Message> {
    let edge = Length::Fixed(size as f32);
    let icon: Element<'a, Message> = match thumbnail {
        Some(handle) => Image::new(handle.clone())
            .width(edge)
            .height(edge)
            .content_fit(ContentFit::Contain)
            .into(),
        // Still loading, or not decodable
        None => Space::new(edge, edge).into(),
    };

    let entry = button(
        row![icon, text(image.display_name())]
            .spacing(10)
            .align_y(Alignment::Center),
    )
    .on_press(Message::ImageClicked(image.clone()))
    .width(Length::Fill)
    .style(if selected { button::primary } else { button::text });

    tooltip(
        entry,
        container(text(image.path().display().to_string())).padding(4),
        tooltip::Position::FollowCursor,
    )
    .into()
}

/// Tab buttons for every staging area plus the "+" button
pub fn tab_strip<'a>(staging: &StagingAreaSet) -> Element<'a, Message> {
    let active = staging.active_id();

    let mut tabs: Vec<Element<'a, Message>> = staging
        .areas()
        .iter()
        .map(|area| {
            let label = button(text(area.label().to_string()))
                .on_press(Message::SelectTab(area.id()))
                .style(if area.id() == active {
                    button::primary
                } else {
                    button::secondary
                });
            let close = button(text("×"))
                .on_press(Message::CloseTab(area.id()))
                .style(button::text);

            row![label, close].spacing(2).into()
        })
        .collect();

    tabs.push(button(text("+")).on_press(Message::AddTab).into());

    Wrap::with_elements(tabs)
        .spacing(6.0)
        .line_spacing(6.0)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_null_raster_has_no_handle() {
        assert!(to_handle(&Raster::null()).is_none());
        assert!(to_handle(&RgbaImage::new(4, 4).into()).is_some());
    }

    #[test]
    fn test_picture_tracks_raster() {
        let mut picture = Picture::default();
        assert!(picture.handle().is_none());

        let raster: Raster = RgbaImage::new(8, 8).into();
        picture.set(raster.clone());
        let first = picture.handle().map(Handle::id);
        assert!(first.is_some());

        // Same raster again keeps the handle
        picture.set(raster);
        assert_eq!(picture.handle().map(Handle::id), first);

        picture.clear();
        assert!(picture.handle().is_none());
    }
}
