mod bookmarks;
mod interactions;
mod positions;
