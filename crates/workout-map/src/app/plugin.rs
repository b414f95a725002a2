//! Walkers plugin drawing workout markers with their popups
//!
//! The plugin also captures map clicks: the clicked screen position is
//! unprojected and left in a shared slot which the app reads after the map
//! has been drawn.

use egui::{Color32, FontId, Pos2, Rect, Shape, Stroke, Vec2};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use walkers::{Plugin, Projector};
use workout_map_lib::{Coords, MarkerView, PopupOptions, WorkoutId, WorkoutType};

/// Slot filled with the geographic position of the last map click
pub type ClickSlot = Arc<Mutex<Option<Coords>>>;

const MARKER_RADIUS: f32 = 7.0;
const POPUP_PADDING: f32 = 8.0;
const POPUP_ACCENT_WIDTH: f32 = 5.0;
const POPUP_TIP: f32 = 8.0;
const POPUP_GAP: f32 = 6.0;

/// Accent colour of a workout type
pub fn type_accent(workout_type: WorkoutType) -> Color32 {
    match workout_type {
        WorkoutType::Running => Color32::from_rgb(0, 196, 106),
        WorkoutType::Cycling => Color32::from_rgb(255, 181, 69),
    }
}

/// Accent colour of a popup style class such as `running-popup`
pub fn accent_for_class(class_name: &str) -> Color32 {
    WorkoutType::all()
        .iter()
        .copied()
        .find(|t| class_name.strip_suffix("-popup") == Some(t.name()))
        .map(type_accent)
        .unwrap_or(Color32::GRAY)
}

/// Which popups are open, given the popups the user closed.
///
/// A popup with `auto_close` is closed as soon as a later popup opens, so
/// only the newest of those stays visible.
pub fn open_popups(markers: &[MarkerView], closed: &HashSet<WorkoutId>) -> Vec<bool> {
    let newest_auto_close = markers.iter().rposition(|m| m.popup.auto_close);
    markers
        .iter()
        .enumerate()
        .map(|(i, marker)| {
            if closed.contains(&marker.id) {
                return false;
            }
            !marker.popup.auto_close || Some(i) == newest_auto_close
        })
        .collect()
}

/// Whether `pointer` lies on one of the drawn popups
pub fn hits_popup(pointer: Pos2, popup_areas: &[Rect]) -> bool {
    popup_areas.iter().any(|area| area.contains(pointer))
}

/// Popups closed by a map click
pub fn closed_by_click(markers: &[MarkerView]) -> impl Iterator<Item = WorkoutId> + '_ {
    markers
        .iter()
        .filter(|m| m.popup.close_on_click)
        .map(|m| m.id.clone())
}

pub struct WorkoutMarkersPlugin {
    markers: Vec<MarkerView>,
    open: Vec<bool>,
    clicks: ClickSlot,
}

impl WorkoutMarkersPlugin {
    pub fn new(markers: Vec<MarkerView>, closed: &HashSet<WorkoutId>, clicks: ClickSlot) -> Self {
        let open = open_popups(&markers, closed);
        Self {
            markers,
            open,
            clicks,
        }
    }

    fn screen_pos(projector: &Projector, coords: Coords) -> Pos2 {
        let v = projector.project(walkers::lat_lon(coords.lat, coords.lng));
        Pos2::new(v.x, v.y)
    }

    fn draw_marker(painter: &egui::Painter, at: Pos2, accent: Color32) {
        painter.circle(at, MARKER_RADIUS, accent, Stroke::new(2.0, Color32::WHITE));
    }

    /// Box of a popup holding `content_size` of text, centered above the
    /// marker at `at`. The tip sits between the box and the marker.
    fn popup_rect(at: Pos2, content_size: Vec2, popup: &PopupOptions) -> Rect {
        let width = (content_size.x + 2.0 * POPUP_PADDING + POPUP_ACCENT_WIDTH)
            .clamp(popup.min_width, popup.max_width);
        let height = content_size.y + 2.0 * POPUP_PADDING;
        let bottom = at.y - MARKER_RADIUS - POPUP_GAP - POPUP_TIP;
        Rect::from_min_size(
            Pos2::new(at.x - width / 2.0, bottom - height),
            egui::vec2(width, height),
        )
    }

    /// Dark rounded box above the marker, accent stripe on the left, tip
    /// pointing down at the marker. Returns the area covered by the popup.
    fn draw_popup(painter: &egui::Painter, at: Pos2, marker: &MarkerView) -> Rect {
        let accent = accent_for_class(&marker.popup.class_name);
        let inner_max = marker.popup.max_width - 2.0 * POPUP_PADDING - POPUP_ACCENT_WIDTH;
        let galley = painter.layout(
            marker.content.clone(),
            FontId::proportional(13.0),
            Color32::from_gray(235),
            inner_max.max(1.0),
        );

        let rect = Self::popup_rect(at, galley.size(), &marker.popup);
        let height = rect.height();
        let bottom = rect.max.y;

        let background = Color32::from_rgb(45, 52, 57);
        painter.rect_filled(rect, 5.0, background);
        painter.rect_filled(
            Rect::from_min_size(rect.min, egui::vec2(POPUP_ACCENT_WIDTH, height)),
            egui::CornerRadius {
                nw: 5,
                sw: 5,
                ne: 0,
                se: 0,
            },
            accent,
        );
        painter.add(Shape::convex_polygon(
            vec![
                Pos2::new(at.x - POPUP_TIP, bottom),
                Pos2::new(at.x + POPUP_TIP, bottom),
                Pos2::new(at.x, bottom + POPUP_TIP),
            ],
            background,
            Stroke::NONE,
        ));

        let text_pos = Pos2::new(
            rect.min.x + POPUP_ACCENT_WIDTH + POPUP_PADDING,
            rect.min.y + POPUP_PADDING,
        );
        painter.galley(text_pos, galley, Color32::WHITE);

        rect.union(Rect::from_min_max(
            Pos2::new(at.x - POPUP_TIP, bottom),
            Pos2::new(at.x + POPUP_TIP, bottom + POPUP_TIP),
        ))
    }
}

impl Plugin for WorkoutMarkersPlugin {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
        _map_memory: &walkers::MapMemory,
    ) {
        profiling::scope!("WorkoutMarkersPlugin::run");

        let painter = ui.painter();
        let positions: Vec<Pos2> = self
            .markers
            .iter()
            .map(|m| Self::screen_pos(projector, m.coords))
            .collect();

        for (marker, at) in self.markers.iter().zip(&positions) {
            Self::draw_marker(painter, *at, type_accent(marker.workout_type));
        }
        // Popups on top of every marker
        let mut popup_areas = Vec::new();
        for ((marker, at), open) in self.markers.iter().zip(&positions).zip(&self.open) {
            if *open && response.rect.contains(*at) {
                popup_areas.push(Self::draw_popup(painter, *at, marker));
            }
        }

        // Clicks on a popup stay on the popup
        if response.clicked()
            && let Some(pointer) = response.interact_pointer_pos()
            && !hits_popup(pointer, &popup_areas)
        {
            let position = projector.unproject(pointer.to_vec2());
            let coords = Coords::new(position.y(), position.x());
            match self.clicks.lock() {
                Ok(mut slot) => *slot = Some(coords),
                Err(e) => tracing::error!("Click slot poisoned: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workout_map_lib::Workout;

    fn markers() -> Vec<MarkerView> {
        vec![
            MarkerView::from(&Workout::running(Coords::new(1.0, 1.0), 5.0, 24.0, 178.0)),
            MarkerView::from(&Workout::cycling(Coords::new(2.0, 2.0), 20.0, 60.0, 10.0)),
        ]
    }

    #[test]
    fn test_accent_for_class() {
        assert_eq!(
            accent_for_class("running-popup"),
            type_accent(WorkoutType::Running)
        );
        assert_eq!(
            accent_for_class("cycling-popup"),
            type_accent(WorkoutType::Cycling)
        );
        assert_eq!(accent_for_class("swimming-popup"), Color32::GRAY);
    }

    #[test]
    fn test_every_popup_stays_open() {
        assert_eq!(open_popups(&markers(), &HashSet::new()), vec![true, true]);
        assert_eq!(closed_by_click(&markers()).count(), 0);
    }

    #[test]
    fn test_auto_close_keeps_newest() {
        let mut markers = markers();
        for m in &mut markers {
            m.popup.auto_close = true;
        }
        assert_eq!(open_popups(&markers, &HashSet::new()), vec![false, true]);
    }

    #[test]
    fn test_closed_popups() {
        let mut markers = markers();
        markers[0].popup.close_on_click = true;
        let closed: HashSet<_> = closed_by_click(&markers).collect();
        assert_eq!(open_popups(&markers, &closed), vec![false, true]);
    }

    #[test]
    fn test_popup_sits_above_marker() {
        let popup = PopupOptions::for_type(WorkoutType::Running);
        let at = Pos2::new(200.0, 300.0);

        let rect = WorkoutMarkersPlugin::popup_rect(at, egui::vec2(80.0, 16.0), &popup);
        assert!(rect.max.y < at.y - MARKER_RADIUS);
        assert_eq!(rect.center().x, at.x);
        assert_eq!(rect.width(), 80.0 + 2.0 * POPUP_PADDING + POPUP_ACCENT_WIDTH);

        let narrow = WorkoutMarkersPlugin::popup_rect(at, egui::vec2(10.0, 16.0), &popup);
        assert_eq!(narrow.width(), popup.min_width);
        let wide = WorkoutMarkersPlugin::popup_rect(at, egui::vec2(900.0, 16.0), &popup);
        assert_eq!(wide.width(), popup.max_width);
    }

    #[test]
    fn test_click_on_popup_is_not_a_map_click() {
        let popup = PopupOptions::for_type(WorkoutType::Cycling);
        let at = Pos2::new(200.0, 300.0);
        let areas = [WorkoutMarkersPlugin::popup_rect(
            at,
            egui::vec2(80.0, 16.0),
            &popup,
        )];

        assert!(hits_popup(areas[0].center(), &areas));
        assert!(!hits_popup(at + egui::vec2(0.0, 40.0), &areas));
        assert!(!hits_popup(areas[0].center(), &[]));
    }
}
