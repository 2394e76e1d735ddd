pub mod actor;
pub mod director;
pub mod director_genre;
pub mod movie;
pub mod movie_genre;
pub mod role;
