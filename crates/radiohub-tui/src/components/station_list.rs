//! StationList component — numbered station list in the left pane.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use radiohub_core::{PlayerState, Station};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        state_color, state_icon, style_muted, C_GENRE, C_NUMBER_HINT, C_PRIMARY, C_SECONDARY,
        C_SELECTION_BG,
    },
    widgets::{
        pane_chrome::{pane_chrome, placeholder},
        scrollable_list::ScrollableList,
    },
};

const PAGE: usize = 10;

pub struct StationList {
    pub list: ScrollableList<Station>,
    list_state: ListState,
}

impl StationList {
    pub fn new(state: &AppState) -> Self {
        // Genre filter is an exact match, same as Catalog::filter_by_genre.
        let mut list = ScrollableList::new(|station: &Station, genre: &str| station.genre == genre);
        list.set_items(state.catalog.list_all().to_vec());
        if let Some(genre) = &state.genre_filter {
            list.set_filter(genre);
        }
        Self {
            list,
            list_state: ListState::default(),
        }
    }

    fn selection_changed(&self) -> Vec<Action> {
        self.list
            .selected_original_index()
            .map(Action::Select)
            .into_iter()
            .collect()
    }

    fn render_item<'a>(
        &self,
        station: &'a Station,
        orig_idx: usize,
        is_selected: bool,
        state: &AppState,
    ) -> ListItem<'a> {
        let playback = &state.playback;
        let is_current = playback.state != PlayerState::Stopped
            && playback.active_station.as_ref() == Some(station);

        let (icon, icon_style) = if is_current {
            (
                state_icon(playback.state),
                Style::default().fg(state_color(playback.state)),
            )
        } else {
            (" ", Style::default())
        };

        let name_style = if is_current {
            Style::default()
                .fg(state_color(playback.state))
                .add_modifier(Modifier::BOLD)
        } else if is_selected {
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_SECONDARY)
        };

        let spans = vec![
            Span::styled(format!(" {} ", icon), icon_style),
            Span::styled(
                format!("{:>2}. ", orig_idx + 1),
                Style::default().fg(C_NUMBER_HINT),
            ),
            Span::styled(station.name.as_str(), name_style),
            Span::styled(format!(" ({})", station.genre), Style::default().fg(C_GENRE)),
        ];

        let item_bg = if is_selected {
            Style::default().bg(C_SELECTION_BG)
        } else {
            Style::default()
        };
        ListItem::new(Line::from(spans)).style(item_bg)
    }
}

impl Component for StationList {
    fn id(&self) -> ComponentId {
        ComponentId::StationList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::PageUp => self.list.select_up(PAGE),
            KeyCode::PageDown => self.list.select_down(PAGE),
            KeyCode::Home => self.list.select_first(),
            KeyCode::End => self.list.select_last(),

            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(idx) = self.list.selected_original_index() {
                    // Enter on the station that is playing stops it; while it
                    // is still loading, Enter restarts it.
                    if state.selected_is_playing() {
                        return vec![Action::Stop];
                    }
                    return vec![Action::Play(idx)];
                }
                return vec![];
            }

            _ => return vec![],
        }
        self.selection_changed()
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::SetGenre(genre) => {
                self.list.set_filter(genre.as_deref().unwrap_or(""));
                self.selection_changed()
            }
            Action::Select(idx) => {
                self.list.set_selected_by_original(*idx);
                vec![]
            }
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let hint = match &state.genre_filter {
            Some(genre) => format!("· {} · {}/{}", genre, self.list.len(), state.catalog.len()),
            None => format!("· all · {}", state.catalog.len()),
        };
        let block = pane_chrome("stations", Some(hint), None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.is_empty() {
            let msg = if state.catalog.is_empty() {
                "  no stations loaded"
            } else {
                "  no stations in this genre"
            };
            frame.render_widget(Paragraph::new(placeholder(msg)), inner);
            return;
        }

        let content_h = inner.height as usize;
        self.list.ensure_visible(content_h);
        let sel_in_view = self.list.selected_in_view(content_h);

        let items: Vec<ListItem> = self
            .list
            .visible_items(content_h)
            .into_iter()
            .enumerate()
            .map(|(view_row, (orig_idx, station))| {
                self.render_item(station, orig_idx, view_row == sel_in_view, state)
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default())
            .highlight_symbol("")
            .style(style_muted());

        self.list_state.select(Some(sel_in_view));
        frame.render_stateful_widget(list, inner, &mut self.list_state);
    }
}
