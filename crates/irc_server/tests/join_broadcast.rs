//! Scenario 3 (§8): JOIN echoes to every member and the joiner gets the
//! NAMREPLY/ENDOFNAMES pair (broadcast completeness, §8's universal
//! property).

mod common;

use common::TestServer;
use irc_server::constants::SERVER_HOST;

#[test]
fn join_echoes_and_namreply() {
    let server = TestServer::spawn();
    let mut alice = server.connect();
    let mut carol = server.connect();

    alice.register("alice");
    carol.register("carol");

    alice.send("JOIN #general");
    assert_eq!(alice.recv(), ":alice!alice@127.0.0.1 JOIN #general");
    assert_eq!(alice.recv(), format!(":{SERVER_HOST} 353 alice = #general :alice"));
    assert_eq!(alice.recv(), format!(":{SERVER_HOST} 366 alice #general :End of /NAMES list"));

    carol.send("JOIN #general");

    // Both prior and new member receive the JOIN echo for carol.
    assert_eq!(alice.recv(), ":carol!carol@127.0.0.1 JOIN #general");
    assert_eq!(carol.recv(), ":carol!carol@127.0.0.1 JOIN #general");

    // carol's NAMREPLY lists every member, one reply line per member.
    let nam1 = carol.recv();
    let nam2 = carol.recv();
    let names: Vec<&str> = [nam1.as_str(), nam2.as_str()]
        .iter()
        .map(|l| l.rsplit(':').next().unwrap())
        .copied()
        .collect();
    assert!(names.contains(&"alice"));
    assert!(names.contains(&"carol"));
    assert_eq!(carol.recv(), format!(":{SERVER_HOST} 366 carol #general :End of /NAMES list"));
}

#[test]
fn joining_the_same_channel_twice_is_a_no_op() {
    let server = TestServer::spawn();
    let mut alice = server.connect();
    alice.register("alice");

    alice.send("JOIN #general");
    alice.recv(); // JOIN echo
    alice.recv(); // NAMREPLY
    alice.recv(); // ENDOFNAMES

    alice.send("JOIN #general");
    alice.send("PING-PROBE"); // unknown command, used only to get a deterministic next reply
    assert_eq!(
        alice.recv(),
        format!(":{SERVER_HOST} 421 alice PING-PROBE :Unknown command"),
        "re-JOIN of the current channel must be silent"
    );
}
