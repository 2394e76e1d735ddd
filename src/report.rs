use std::{fs, path::Path};

use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Runs the canned report queries against a populated store and writes one
/// text file per report. A failing report does not stop the others.
pub async fn write_all(db: &DatabaseConnection, out_dir: &Path) -> AppResult<()> {
    fs::create_dir_all(out_dir).map_err(|err| AppError::io(out_dir, err))?;

    let top = top_movies_by_genre(db, "Action").await;
    finish_report(out_dir, "top_movies_action.txt", top);

    let directors = directors_with_genres(db).await;
    finish_report(out_dir, "directors_genres.txt", directors);

    let actors = actors_with_roles(db).await;
    finish_report(out_dir, "actors_roles.txt", actors);

    Ok(())
}

// Query and write failures alike are confined to their report; the
// remaining reports still run.
fn finish_report(out_dir: &Path, file_name: &str, result: AppResult<Vec<String>>) {
    let lines = match result {
        Ok(lines) => lines,
        Err(err) => {
            warn!(report = file_name, error = %err, "report failed");
            return;
        },
    };

    match write_lines(&out_dir.join(file_name), &lines) {
        Ok(()) => info!(report = file_name, rows = lines.len() - 1, "report written"),
        Err(err) => warn!(report = file_name, error = %err, "report failed"),
    }
}

async fn top_movies_by_genre(db: &DatabaseConnection, genre: &str) -> AppResult<Vec<String>> {
    let stmt = Statement::from_sql_and_values(
        db.get_database_backend(),
        "SELECT m.movie_name, m.movie_year, m.movie_rank \
         FROM movies m \
         JOIN movies_genres mg ON m.movie_id = mg.movie_id \
         WHERE mg.genre = ? AND m.movie_rank IS NOT NULL \
         ORDER BY m.movie_rank DESC \
         LIMIT 10",
        [genre.into()],
    );

    let mut lines = vec![format!("Top 10 Movies in Genre '{genre}':")];
    for row in db.query_all(stmt).await? {
        let name: String = row.try_get("", "movie_name")?;
        let year: Option<i32> = row.try_get("", "movie_year")?;
        let rank: f64 = row.try_get("", "movie_rank")?;
        let year = year.map(|y| y.to_string()).unwrap_or_else(|| "unknown".to_string());
        lines.push(format!("Name: {name}, Year: {year}, Rank: {rank:.2}"));
    }

    Ok(lines)
}

async fn directors_with_genres(db: &DatabaseConnection) -> AppResult<Vec<String>> {
    let stmt = Statement::from_string(
        db.get_database_backend(),
        "SELECT d.director_name, dg.genre \
         FROM directors d \
         JOIN directors_genres dg ON d.director_id = dg.director_id \
         ORDER BY d.director_name"
            .to_string(),
    );

    let mut lines = vec!["Directors and their Genres:".to_string()];
    for row in db.query_all(stmt).await? {
        let name: String = row.try_get("", "director_name")?;
        let genre: String = row.try_get("", "genre")?;
        lines.push(format!("Director: {name}, Genre: {genre}"));
    }

    Ok(lines)
}

async fn actors_with_roles(db: &DatabaseConnection) -> AppResult<Vec<String>> {
    let stmt = Statement::from_string(
        db.get_database_backend(),
        "SELECT a.actor_name, r.role_name, m.movie_name \
         FROM actors a \
         JOIN roles r ON a.actor_id = r.actor_id \
         JOIN movies m ON r.movie_id = m.movie_id \
         ORDER BY a.actor_name"
            .to_string(),
    );

    let mut lines = vec!["Actors and their Roles:".to_string()];
    for row in db.query_all(stmt).await? {
        let actor: String = row.try_get("", "actor_name")?;
        let role: String = row.try_get("", "role_name")?;
        let movie: String = row.try_get("", "movie_name")?;
        lines.push(format!("Actor: {actor}, Role: {role}, Movie: {movie}"));
    }

    Ok(lines)
}

fn write_lines(path: &Path, lines: &[String]) -> AppResult<()> {
    let mut body = lines.join("\n");
    body.push('\n');
    fs::write(path, body).map_err(|err| AppError::io(path, err))
}
