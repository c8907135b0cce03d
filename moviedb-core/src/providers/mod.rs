pub mod tmdb;
pub mod traits;

pub use tmdb::{TmdbClient, TmdbSettings};
pub use traits::{
    CastMember, Configuration, CrewMember, Genre, ImageFile, ImagesConfiguration,
    MetadataProvider, MovieCredits, MovieDetails, MovieImages, PopularMovie,
    PopularMoviesPage, ProviderError,
};
