//! Scenario 2 (§8): ASCII case is NOT folded, so `Bob` and `bob` coexist,
//! but a second `bob` collides once taken.

mod common;

use common::TestServer;
use irc_server::constants::SERVER_HOST;

#[test]
fn ascii_case_does_not_collide_but_exact_nick_does() {
    let server = TestServer::spawn();
    let mut session1 = server.connect();
    let mut session2 = server.connect();

    session1.register("bob");

    // `Bob` (different ASCII case) is accepted: no ERR_NICKNAMEINUSE.
    session2.send("NICK Bob");
    session2.send("USER Bob 0 * :Bob Two");
    assert_eq!(session2.recv(), format!(":{SERVER_HOST} 375 Bob :- {SERVER_HOST} Message of the day - "));
    assert_eq!(session2.recv(), format!(":{SERVER_HOST} 372 Bob :- Welcome to the server"));
    assert_eq!(session2.recv(), format!(":{SERVER_HOST} 376 Bob :End of /MOTD command"));

    // Now session2 tries the exact nick already in use.
    session2.send("NICK bob");
    assert_eq!(session2.recv(), format!(":{SERVER_HOST} 433 Bob bob :Nickname is already in use"));
}

#[test]
fn folded_nickname_collides() {
    let server = TestServer::spawn();
    let mut session1 = server.connect();
    let mut session2 = server.connect();

    session1.register("fo{o");

    session2.send("NICK fo[o");
    assert_eq!(session2.recv(), format!(":{SERVER_HOST} 433 * fo[o :Nickname is already in use"));
}
