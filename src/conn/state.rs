use super::{client::Client, room::Room};
use crate::core::Error;
use std::collections::{hash_map::Entry, HashMap, HashSet};
use uuid::Uuid;

/// Registry data behind the hub lock
pub struct HubState {
    clients: HashMap<Uuid, ClientState>,
    rooms: HashMap<String, Room>,
    room_capacity: usize,
}

impl HubState {
    pub fn new(room_capacity: usize) -> Self {
        Self {
            clients: HashMap::new(),
            rooms: HashMap::new(),
            room_capacity,
        }
    }

    pub fn status(&self) -> HubStatus {
        HubStatus {
            num_clients: self.clients.len(),
            num_rooms: self.rooms.len(),
        }
    }

    /// Add the client to the registry, names must be unique
    pub fn register_client(&mut self, client: &Client) -> Result<(), Error> {
        if self.find_client_by_name(client.name()).is_some() {
            return Err(Error::NameTaken(client.name().to_owned()));
        }
        self.clients.insert(client.id(), ClientState::new(client));
        Ok(())
    }

    /// Remove the client from the registry and from every room it joined.
    ///
    /// Returns false if the client was not registered.
    pub async fn unregister_client(&mut self, client: &Client) -> Result<bool, Error> {
        let Some(cs) = self.clients.remove(&client.id()) else {
            return Ok(false);
        };

        for name in &cs.rooms {
            if let Some(room) = self.rooms.get(name) {
                room.unregister(client.id()).await?;
            }
        }
        Ok(true)
    }

    /// First registered client with the given name
    pub fn find_client_by_name(&self, name: &str) -> Option<Client> {
        self.clients
            .values()
            .find(|cs| cs.client.name() == name)
            .map(|cs| cs.client.clone())
    }

    pub fn find_room(&self, name: &str) -> Option<Room> {
        self.rooms.get(name).cloned()
    }

    /// Return the room with this name, creating it if needed
    pub fn create_room(&mut self, name: &str) -> Room {
        match self.rooms.entry(name.to_owned()) {
            Entry::Occupied(o) => o.get().clone(),
            Entry::Vacant(v) => {
                tracing::debug!("create room {}", name);
                v.insert(Room::spawn(name, self.room_capacity)).clone()
            }
        }
    }

    /// Put the client into the room on both sides of the membership.
    ///
    /// Returns false if the client is not registered.
    pub async fn join_room(&mut self, client: &Client, name: &str) -> Result<bool, Error> {
        if !self.clients.contains_key(&client.id()) {
            return Ok(false);
        }

        let room = self.create_room(name);
        if let Some(cs) = self.clients.get_mut(&client.id()) {
            if cs.rooms.insert(name.to_owned()) {
                room.register(client.clone()).await?;
            }
        }
        Ok(true)
    }

    /// Take the client out of the room on both sides of the membership.
    ///
    /// Returns false if the client was not a member.
    pub async fn leave_room(&mut self, client: &Client, name: &str) -> Result<bool, Error> {
        let Some(cs) = self.clients.get_mut(&client.id()) else {
            return Ok(false);
        };
        if !cs.rooms.remove(name) {
            return Ok(false);
        }

        if let Some(room) = self.rooms.get(name) {
            room.unregister(client.id()).await?;
        }
        Ok(true)
    }

    /// Names of the rooms the client belongs to
    pub fn client_rooms(&self, client_id: Uuid) -> Option<Vec<String>> {
        self.clients
            .get(&client_id)
            .map(|cs| cs.rooms.iter().cloned().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubStatus {
    pub num_clients: usize,
    pub num_rooms: usize,
}

struct ClientState {
    client: Client,
    rooms: HashSet<String>, // joined room list
}

impl ClientState {
    fn new(client: &Client) -> Self {
        Self {
            client: client.clone(),
            rooms: HashSet::new(),
        }
    }
}
