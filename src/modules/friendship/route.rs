use crate::modules::friendship::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/user/friends")
            .service(register_friendship)
            .service(update_friendship)
            .service(remove_friendship)
            .service(count_friends)
            .service(list_friendships),
    );
}
