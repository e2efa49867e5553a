// End-to-end tests for the LearnFlow backend API.
//
// Most tests run the real axum router on in-memory storage with scripted model
// and speech vendors, so they need nothing but a free local port. Each test
// gets its own server and stores through the test-context lifecycle hooks.
//
// `test_postgres` repeats the queue flows against a PostgreSQL testcontainer
// (one shared container, one isolated database per test) and is ignored unless
// run explicitly with Docker available.

mod helpers;
mod test_agents;
mod test_health;
mod test_postgres;
