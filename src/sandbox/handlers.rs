pub mod boards;
pub mod cards;
pub mod general;
pub mod lists;
pub mod organizations;

pub use boards::{board_cards, board_lists, create_board, delete_board, get_board, update_board};
pub use cards::{create_card, delete_card, get_card, update_card};
pub use general::{health_check, require_credentials};
pub use lists::{close_list, create_list, get_list, list_cards};
pub use organizations::{
    create_organization, delete_organization, get_organization, update_organization,
};
